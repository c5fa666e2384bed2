use tracing::info;
use ui_scout::browser::{ChromeBrowser, DiscoverySession};
use ui_scout::core::Config;
use ui_scout::logging::{self, LogFormat};
use ui_scout::ScanOutcome;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(LogFormat::detect(), true);

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com".to_string());

    let mut session = DiscoverySession::new(ChromeBrowser::new(), Config::default(), url);

    match session.scan().await {
        ScanOutcome::Complete(elements) => {
            info!(count = elements.len(), "scan complete");
            for element in &elements {
                println!(
                    "#{} <{}> score={} disabled={} {:?}",
                    element.id, element.tag, element.score, element.disabled, element.text
                );
            }
        }
        ScanOutcome::Degraded { reason } => {
            info!(%reason, "scan degraded");
        }
    }

    let snapshot = session.snapshot().await?;
    println!("{} - {}", snapshot.url, snapshot.title);

    let path = session.capture_screenshot().await?;
    println!("screenshot: {}", path.display());

    session.close().await?;
    Ok(())
}
