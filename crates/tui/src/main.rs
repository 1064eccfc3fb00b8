mod app;
mod client;
mod config;
mod error;
mod logging;
mod ui;
mod view;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config.log_level, &config.log_file)?;

    let mut app = app::App::start(&config).await?;
    if config.print {
        app.print(&mut std::io::stdout().lock())?;
        return Ok(());
    }
    app.run()
}
