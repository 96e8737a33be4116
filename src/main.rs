mod catalog;
mod session;

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError};
use crate::session::{Session, SessionError};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to encode report: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "roomplan", about = "Replay a room layout session against the canvas engine")]
struct Cli {
    /// Product catalog (JSON).
    #[arg(long, env = "ROOMPLAN_CATALOG")]
    catalog: PathBuf,

    /// Session script (JSON lines), or `-` for stdin.
    #[arg(long, env = "ROOMPLAN_SESSION", default_value = "-")]
    session: String,

    #[arg(long, env = "ROOMPLAN_CANVAS_WIDTH", default_value_t = 800.0)]
    canvas_width: f64,

    #[arg(long, env = "ROOMPLAN_CANVAS_HEIGHT", default_value_t = 600.0)]
    canvas_height: f64,

    /// Pretty-print the final report.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let catalog = Catalog::load(&cli.catalog)?;
    info!(path = %cli.catalog.display(), products = catalog.products.len(), "catalog loaded");

    let script = session::read_script(&cli.session)?;
    let mut session = Session::new(&catalog, cli.canvas_width, cli.canvas_height)?;
    for step in &script {
        let actions = session.apply(step)?;
        debug!(line = step.line, ?actions, "step applied");
    }
    info!(steps = script.len(), items = session.core().scene.len(), "session replayed");

    let report = session.report();
    let rendered =
        if cli.pretty { serde_json::to_string_pretty(&report)? } else { serde_json::to_string(&report)? };
    println!("{rendered}");
    Ok(())
}
