//! prompt-wrangler: interactive extraction CLI entrypoint.

use std::io;
use std::process::ExitCode;

use prompt_wrangler::ai::OpenAiClient;
use prompt_wrangler::config::Config;
use prompt_wrangler::interactive::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();
    prompt_wrangler::init_tracing();

    let config = Config::from_env();

    println!("--- Prompt Wrangler CLI ---");

    let client = match OpenAiClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            println!("ERROR: {e}");
            println!("Exiting due to OpenAI client initialization failure.");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(&config, &client, io::stdin().lock(), io::stdout().lock());
    match session.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Session aborted");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
