mod cli;
mod config;
mod detect;
mod logging;
mod recode;
mod runner;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose, app.no_color);
    runner::run(app)
}
