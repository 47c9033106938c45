use crate::domain::payment::PaymentResult;
use crate::error::Result;
use std::io::Write;

/// Writes a payment report as CSV, one row per employee.
pub struct ResultWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_results(&mut self, results: &[PaymentResult]) -> Result<()> {
        for result in results {
            self.writer.serialize(result)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
