use std::process::ExitCode;

use tour_forms::{app_info::AppInfo, boot::boot};

#[tokio::main]
async fn main() -> ExitCode {
    match boot(AppInfo::current()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}
