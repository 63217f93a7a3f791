use std::time::Duration;

use appshelf_catalog::{Catalog, CatalogEntry};
use appshelf_install::{InstallStatus, Notification};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use tabled::{
    Table, Tabled,
    settings::{Panel, Style},
};

#[derive(Debug, Tabled)]
pub struct CatalogRow {
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "VERSION")]
    pub version: String,
    #[tabled(rename = "DEVELOPER")]
    pub developer: String,
}

impl From<&CatalogEntry> for CatalogRow {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            name: entry.name().to_string(),
            version: entry.version().to_string(),
            developer: entry.developer().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormatConfig {
    pub header: Option<String>,
}

pub fn catalog_table(catalog: &Catalog, config: FormatConfig) -> Table {
    let mut table = Table::new(catalog.iter().map(CatalogRow::from));
    if let Some(header) = config.header {
        table.with(Panel::header(header));
    }
    table.with(Style::blank());
    table
}

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

static SPINNER_STYLE: Lazy<ProgressStyle> = Lazy::new(|| {
    ProgressStyle::with_template("{spinner:.blue} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(TICK)
});

/// Spinner shown while an install runs; status updates become its message.
pub struct InstallProgress {
    pb: ProgressBar,
}

impl InstallProgress {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(SPINNER_STYLE.clone());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub fn update(&self, status: &InstallStatus) {
        // Final lines go to stdout even when the spinner is hidden.
        match status {
            InstallStatus::Succeeded { .. } | InstallStatus::Failed { .. } => {
                self.pb.finish_and_clear();
            }
            _ => {}
        }
        if let Some(notice) = status.notification() {
            self.pb.suspend(|| eprintln!("{}", notice_line(&notice)));
        }
        if let Some(line) = summary_line(status) {
            println!("{line}");
        } else if let Some(line) = status.status_line() {
            self.pb.set_message(line);
        }
    }

    pub fn finish(&self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}

/// Result line printed once the install has finished.
pub fn summary_line(status: &InstallStatus) -> Option<String> {
    let line = status.status_line()?;
    match status {
        InstallStatus::Succeeded { .. } => Some(style(line).green().to_string()),
        InstallStatus::Failed { .. } => Some(style(line).red().to_string()),
        _ => None,
    }
}

pub fn notice_line(notice: &Notification) -> String {
    match notice {
        Notification::Info { title, message } => {
            format!("{} {message}", style(format!("{title}:")).yellow().bold())
        }
        Notification::Error { message } => {
            format!("{} {message}", style("error:").red().bold())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_table_rows() {
        let catalog = appshelf_catalog::parse(
            r#"[{"Name":"Zeta","Version":"2.0","Developer":"Z Corp"},{"Name":"Alpha","Version":"0.1"}]"#
                .as_bytes(),
        )
        .unwrap();
        let rendered = catalog_table(
            &catalog,
            FormatConfig {
                header: Some("2 apps".into()),
            },
        )
        .to_string();

        let alpha = rendered.find("Alpha").unwrap();
        let zeta = rendered.find("Zeta").unwrap();
        assert!(alpha < zeta);
        assert!(rendered.contains("Z Corp"));
        assert!(rendered.contains("2 apps"));
    }

    #[test]
    fn test_notice_line_carries_message() {
        console::set_colors_enabled(false);
        let line = notice_line(&Notification::Error {
            message: "failed to remove /tmp/fyne-icon-1.png".into(),
        });
        assert_eq!(line, "error: failed to remove /tmp/fyne-icon-1.png");
    }

    #[test]
    fn test_summary_line_for_finished_installs() {
        console::set_colors_enabled(false);
        let failed = InstallStatus::Failed {
            package: "fyne.io/broken".into(),
            message: "go: module not found".into(),
        };
        assert_eq!(summary_line(&failed).as_deref(), Some("go: module not found"));

        let installed = InstallStatus::Succeeded {
            package: "fyne.io/notes".into(),
        };
        assert_eq!(summary_line(&installed).as_deref(), Some("Installed fyne.io/notes."));

        let started = InstallStatus::Started {
            package: "fyne.io/notes".into(),
        };
        assert_eq!(summary_line(&started), None);
    }
}
