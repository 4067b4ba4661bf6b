use super::super::scoring::ScoredRow;
use std::io::Write;

/// Writes recommendations as CSV with a header row, one line per scored row.
pub fn write_recommendations_csv<'a, W, I>(writer: W, rows: I) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a ScoredRow>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row.to_view())?;
    }
    csv_writer.flush()?;
    Ok(())
}
