use pokerd::config::TableConfig;
use pokerd::hosting::Server;

#[tokio::main]
async fn main() {
    pokerd::log();
    pokerd::kys();
    let config = TableConfig::load();
    Server::run(config).await.expect("dealer service crashed");
}
