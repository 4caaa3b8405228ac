mod app;
mod cli;
mod color;
mod state;
mod ui;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    cli::run()
}
