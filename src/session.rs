use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{ReportError, Result};
use crate::loader;
use crate::models::{Dataset, Selection};
use crate::render::{self, Artifacts, RenderOptions};
use crate::selector::TimeOptions;

/// The state carried between interactions: the loaded dataset, the offered
/// periods, and the current selection. Each is replaced whole, never patched.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    options: TimeOptions,
    selection: Selection,
    today: NaiveDate,
    pub render_options: RenderOptions,
}

impl Session {
    pub fn new(dataset: Dataset, today: NaiveDate) -> Result<Self> {
        let no_records =
            || ReportError::MalformedInput(format!("{} contains no records", dataset.source));
        if dataset.is_empty() {
            return Err(no_records());
        }
        let options = TimeOptions::from_dataset(&dataset, today);
        let selection = options.default_selection().ok_or_else(no_records)?;
        log::info!(
            "session opened on {} ({} records), selected {selection}",
            dataset.source,
            dataset.len()
        );
        Ok(Self {
            dataset,
            options,
            selection,
            today,
            render_options: RenderOptions::default(),
        })
    }

    pub fn open(path: &Path, today: NaiveDate) -> Result<Self> {
        Self::new(loader::load_file(path)?, today)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn time_options(&self) -> &TimeOptions {
        &self.options
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Swap in a new dataset and reset the selection to its defaults.
    fn replace(&mut self, dataset: Dataset) -> Result<()> {
        let next = Self::new(dataset, self.today)?;
        self.dataset = next.dataset;
        self.options = next.options;
        self.selection = next.selection;
        Ok(())
    }

    /// Load a replacement file. On failure the current dataset stays active.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        match std::fs::File::open(path) {
            Ok(file) => self.load_reader(BufReader::new(file), &loader::source_label(path)),
            Err(e) => {
                log::info!("keeping {}: cannot open {}: {e}", self.dataset.source, path.display());
                Err(e.into())
            }
        }
    }

    /// Load a replacement dataset from any reader, e.g. an in-memory upload.
    pub fn load_reader<R: Read>(&mut self, reader: R, source: &str) -> Result<()> {
        let result = loader::load_reader(reader, source).and_then(|ds| self.replace(ds));
        if let Err(e) = &result {
            // Below warn: the dashboard owns the terminal and shows the error itself.
            log::info!("keeping {}: load of {source} failed: {e}", self.dataset.source);
        }
        result
    }

    /// Select a year and a month by name, as offered by the time options.
    pub fn select(&mut self, year: i32, month_name: &str) -> Result<Selection> {
        let selection = self.options.resolve(year, month_name)?;
        self.set_selection(selection)?;
        Ok(selection)
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<()> {
        if !self.options.contains(&selection) {
            return Err(ReportError::InvalidSelection(format!(
                "{selection} is not offered for {}",
                self.dataset.source
            )));
        }
        if selection != self.selection {
            log::info!("selected {selection}");
        }
        self.selection = selection;
        Ok(())
    }

    pub fn step_year(&mut self, delta: i32) {
        self.selection.year = self.options.step_year(self.selection.year, delta);
    }

    pub fn step_month(&mut self, delta: i32) {
        self.selection.month = self.options.step_month(self.selection.month, delta);
    }

    pub fn render(&self) -> Result<Artifacts> {
        render::render(&self.dataset, self.selection, self.render_options)
    }
}
