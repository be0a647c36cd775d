use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    smart_ocr_client_lib::init_tracing();

    let file = std::env::args_os().nth(1).map(PathBuf::from);
    let outcome = smart_ocr_client_lib::run(file).await;

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
