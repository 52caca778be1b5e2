use freemobile::domain::DEFAULT_UNSUPPORTED_NOTE;
use freemobile::{Credentials, FreeMobileClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("freemobile=debug")),
        )
        .init();

    // FREEMOBILE_USER and FREEMOBILE_PASS come from the account's "Notifications par SMS" option.
    let credentials = Credentials::from_env()?;
    let message = std::env::var("FREEMOBILE_MESSAGE")
        .unwrap_or_else(|_| "Hello from the freemobile demo \u{1F44B}".to_owned());

    let client = FreeMobileClient::builder(credentials)
        .unsupported_symbol_note(DEFAULT_UNSUPPORTED_NOTE)
        .build()?;

    match client.send(&message).await {
        Ok(response) => println!("delivered in {} chunk(s)", response.len()),
        Err(err) if err.is_partial_delivery() => {
            eprintln!("message cut short: {err}");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
