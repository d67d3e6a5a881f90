use serde::Serialize;

/// Print `report` as the same `{ "success": true, ... }` envelope the HTTP
/// handlers return.
pub fn print_envelope<T: Serialize>(report: &T) -> anyhow::Result<()> {
    let value = tour_core::envelope::success(report)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
