//! `order-desk export`

use std::io::Write;
use std::path::PathBuf;

use order_desk_admin::{AppError, OrderListController, OrdersService};

use super::{FilterArgs, stage_filters};

/// Export matching orders and write the CSV to disk.
pub async fn run<S: OrdersService>(
    controller: &mut OrderListController<S>,
    filters: &FilterArgs,
    path: Option<PathBuf>,
    out: &mut impl Write,
) -> Result<(), AppError> {
    stage_filters(controller, filters.query()?);

    let Some(file) = controller.export_current_view().await else {
        let message = controller
            .state()
            .export_error()
            .unwrap_or("Export failed")
            .to_string();
        return Err(AppError::Operation(message));
    };

    let path = path.unwrap_or_else(|| PathBuf::from(&file.file_name));
    tokio::fs::write(&path, &file.bytes).await?;

    tracing::info!(path = %path.display(), size = file.bytes.len(), "Export written");
    writeln!(out, "Wrote {} bytes to {}", file.bytes.len(), path.display())?;
    Ok(())
}
