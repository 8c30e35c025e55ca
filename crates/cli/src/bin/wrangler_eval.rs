//! wrangler-eval: runs the built-in fixtures and writes a timestamped log.

use std::io;
use std::process::ExitCode;

use prompt_wrangler::ai::OpenAiClient;
use prompt_wrangler::config::Config;
use prompt_wrangler::harness::Harness;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    prompt_wrangler::init_tracing();

    let config = Config::from_env();
    let mut console = io::stdout();

    // Errors are reported by the harness itself
    match Harness::new(&config)
        .run(OpenAiClient::from_config, &mut console)
        .await
    {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
