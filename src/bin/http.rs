use plan_tool::{SelectionConfig, Session, http_api, load_template_from_csv};
use std::net::SocketAddr;

const DEFAULT_TEMPLATE: &str = "data/training_schedule.csv";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let template = load_template_from_csv(DEFAULT_TEMPLATE).unwrap_or_default();
    let start_date = chrono::Local::now().date_naive();
    let config = SelectionConfig::for_template(&template, start_date, Vec::new());
    let session = Session::new(template, config);

    let addr: SocketAddr = std::env::var("PLAN_HTTP_ADDR")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

    println!("training-plan http api listening on {addr}");
    http_api::serve(addr, session).await
}
