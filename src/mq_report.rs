//! Report sinks for sweep results

use std::io::Write;

use log::info;

use crate::mq_error::SimError;
use crate::mq_interface::SweepRow;
use crate::mq_sweep::{seed_hex, SweepConfig};

/// Receives the configuration once, then one row per queue size
pub trait ReportSink {
    fn begin(&mut self, config: &SweepConfig, seed: &[u8; 32]) -> Result<(), SimError>;

    fn row(&mut self, row: &SweepRow) -> Result<(), SimError>;

    fn finish(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

// ============================================================================
// Log Table Sink
// ============================================================================

/// Aligned table written through the `log` facade
#[derive(Debug, Default)]
pub struct LogTableSink {
    report_losses: bool,
}

impl LogTableSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header line for the table
    pub fn header(report_losses: bool) -> String {
        let mut line = String::from(
            "Q Size | Throughput (PR/h) | Avg Time to Merge (m) | Median Time to Merge (m)",
        );
        if report_losses {
            line.push_str(" | PRs Lost (PR/h)");
        }
        line
    }

    /// Separator line under the header
    pub fn separator(report_losses: bool) -> String {
        let mut line = String::from(
            "-------|-------------------|-----------------------|--------------------------",
        );
        if report_losses {
            line.push_str("|-----------------");
        }
        line
    }

    /// One table row, values to one decimal
    pub fn format_row(row: &SweepRow, report_losses: bool) -> String {
        let r = &row.result;
        let mut line = format!(
            "{:<6} | {:<17.1} | {:<21.1} | {:<24.1}",
            row.queue_size, r.throughput_per_hour, r.mean_wait_minutes, r.median_wait_minutes
        );
        if report_losses {
            line.push_str(&format!(" | {:.1}", r.jobs_lost_per_hour));
        } else {
            line.truncate(line.trim_end().len());
        }
        line
    }
}

impl ReportSink for LogTableSink {
    fn begin(&mut self, config: &SweepConfig, seed: &[u8; 32]) -> Result<(), SimError> {
        self.report_losses = config.report_losses;

        info!("");
        info!("Job duration : {}m", config.job_duration);
        info!("Job failure probability : {}", config.failure_probability);
        info!(
            "Jobs waiting to enter the queue probability : {}",
            config.overflow_probability
        );
        info!("Jobs waiting to enter the queue : {}", config.overflow_count);
        info!("Simulation duration : {}h", config.sim_duration_hours);
        info!("Seed : {}", seed_hex(seed));
        info!("");
        info!("{}", Self::header(self.report_losses));
        info!("{}", Self::separator(self.report_losses));
        Ok(())
    }

    fn row(&mut self, row: &SweepRow) -> Result<(), SimError> {
        info!("{}", Self::format_row(row, self.report_losses));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SimError> {
        info!("");
        Ok(())
    }
}

// ============================================================================
// CSV Sink
// ============================================================================

/// Comma separated rows, one per queue size
pub struct CsvSink<W: Write> {
    writer: W,
    report_losses: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            report_losses: true,
        }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for CsvSink<W> {
    fn begin(&mut self, config: &SweepConfig, _seed: &[u8; 32]) -> Result<(), SimError> {
        self.report_losses = config.report_losses;
        write!(
            self.writer,
            "queue_size,throughput_per_hour,mean_wait_minutes,median_wait_minutes"
        )?;
        if self.report_losses {
            write!(self.writer, ",jobs_lost_per_hour")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn row(&mut self, row: &SweepRow) -> Result<(), SimError> {
        let r = &row.result;
        write!(
            self.writer,
            "{},{:.1},{:.1},{:.1}",
            row.queue_size, r.throughput_per_hour, r.mean_wait_minutes, r.median_wait_minutes
        )?;
        if self.report_losses {
            write!(self.writer, ",{:.1}", r.jobs_lost_per_hour)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SimError> {
        self.writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// Collecting and Fan-out Sinks
// ============================================================================

/// Keeps every reported row in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    seed: Option<[u8; 32]>,
    rows: Vec<SweepRow>,
}

impl CollectingSink {
    pub fn seed(&self) -> Option<[u8; 32]> {
        self.seed
    }

    pub fn rows(&self) -> &[SweepRow] {
        &self.rows
    }
}

impl ReportSink for CollectingSink {
    fn begin(&mut self, _config: &SweepConfig, seed: &[u8; 32]) -> Result<(), SimError> {
        self.seed = Some(*seed);
        self.rows.clear();
        Ok(())
    }

    fn row(&mut self, row: &SweepRow) -> Result<(), SimError> {
        self.rows.push(row.clone());
        Ok(())
    }
}

/// Forwards every call to each inner sink in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn ReportSink>) {
        self.sinks.push(sink);
    }
}

impl ReportSink for FanoutSink {
    fn begin(&mut self, config: &SweepConfig, seed: &[u8; 32]) -> Result<(), SimError> {
        for sink in &mut self.sinks {
            sink.begin(config, seed)?;
        }
        Ok(())
    }

    fn row(&mut self, row: &SweepRow) -> Result<(), SimError> {
        for sink in &mut self.sinks {
            sink.row(row)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SimError> {
        for sink in &mut self.sinks {
            sink.finish()?;
        }
        Ok(())
    }
}
