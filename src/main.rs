use clap::Parser;
use small_data::utils::{logger, validation::Validate};
use small_data::{
    config::cli::request_options, CliConfig, Command, Fetcher, KeyValue, Payload, RequestState,
    StoreHandle,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting small-data CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!("❌ Command failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(config: CliConfig) -> anyhow::Result<()> {
    match &config.command {
        Command::Fetch {
            url,
            method,
            headers,
            body,
        } => {
            let options = request_options(method, headers, body.as_deref())?;
            let fetcher = Fetcher::new();
            match fetcher.fetch(url, &options).await {
                RequestState::Succeeded(payload) => print_payload(&payload)?,
                RequestState::Failed(message) => anyhow::bail!(message),
                state => anyhow::bail!("Unexpected request state: {:?}", state),
            }
        }
        command => {
            let store = StoreHandle::open(config.store_config());
            if !store.ready_wait().await {
                anyhow::bail!("Store could not be opened: {}", config.db_path.display());
            }
            match command {
                Command::Get { key } => match store.get(key).await? {
                    Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                    None => println!("(not found)"),
                },
                Command::Put { key, value } => {
                    store.put(key, &parse_value(value)).await?;
                    println!("✅ Stored value under key '{}'", key);
                }
                Command::Del { key } => {
                    store.del(key).await?;
                    println!("✅ Deleted key '{}'", key);
                }
                Command::Append { value } => {
                    let id = store.append(&parse_value(value)).await?;
                    println!("✅ Stored value under key '{}'", id);
                }
                Command::Fetch { .. } => unreachable!(),
            }
        }
    }
    Ok(())
}

// CLI convenience: anything that is not valid JSON is stored as a string.
fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn print_payload(payload: &Payload) -> anyhow::Result<()> {
    match payload {
        Payload::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Payload::Text(text) => println!("{}", text),
        Payload::Bytes(bytes) => println!("({} bytes of binary data)", bytes.len()),
    }
    Ok(())
}
