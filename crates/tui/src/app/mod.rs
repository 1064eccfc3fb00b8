use std::{io::Write, time::Duration};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{EntryCollection, LocalStore, MemoryStore};

use crate::{
    client::{Client, LegacyEntry},
    config::{AppConfig, Source},
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
    view::{LedgerView, RowField},
};

/// Session-only collection seeded from legacy records.
fn remote_collection(records: Vec<LegacyEntry>) -> Result<EntryCollection> {
    let entries = records
        .into_iter()
        .map(LegacyEntry::into_entry)
        .collect::<engine::ResultEngine<Vec<_>>>()?;
    tracing::info!(entries = entries.len(), "legacy ledger fetched");
    Ok(EntryCollection::new(MemoryStore::seeded(entries)))
}

/// What one frame draws.
#[derive(Debug, Clone, Copy)]
pub struct AppState<'a> {
    pub view: &'a LedgerView,
    pub source: &'a str,
    pub status: Option<&'a str>,
}

pub struct App {
    collection: EntryCollection,
    view: LedgerView,
    source: String,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    /// Builds the store for the configured source, attaches the view and
    /// loads the collection into it.
    pub async fn start(config: &AppConfig) -> Result<Self> {
        let (collection, source) = match config.source {
            Source::Local => {
                let store = LocalStore::with_key(&config.store_path, &config.store_key);
                let source = format!("{} [{}]", config.store_path, config.store_key);
                (EntryCollection::new(store), source)
            }
            Source::Remote => {
                let records = Client::new(&config.remote_url)?.finances().await?;
                let source = format!("{} (session only)", config.remote_url);
                (remote_collection(records)?, source)
            }
        };

        Self::with_collection(collection, source)
    }

    /// Attaches the view to `collection` and loads it.
    fn with_collection(mut collection: EntryCollection, source: String) -> Result<Self> {
        let view = LedgerView::attach(&mut collection);
        collection.load()?;
        tracing::info!(%source, "ledger started");

        Ok(Self {
            collection,
            view,
            source,
            status: None,
            should_quit: false,
        })
    }

    /// Writes the rendered rows and the total, one row per line.
    pub fn print(&self, out: &mut impl Write) -> Result<()> {
        let state = self.view.state();
        for row in &state.rows {
            writeln!(
                out,
                "{:<11}{:>10}  {}",
                row.human_date(),
                row.amount(),
                row.description()
            )?;
        }
        writeln!(out, "Total: {}", state.total_text())?;
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            let state = AppState {
                view: &self.view,
                source: &self.source,
                status: self.status.as_deref(),
            };
            terminal
                .draw(|frame| ui::render(frame, &state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key)?;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match map_key(key) {
            AppAction::Quit => self.should_quit = true,
            AppAction::Cancel => {
                self.view.blur(&mut self.collection)?;
            }
            AppAction::NextField => self.view.next_focus(&mut self.collection)?,
            AppAction::Submit => {
                if self.view.submit(&mut self.collection)?.is_some() {
                    self.status = Some("Entry added.".to_string());
                }
            }
            AppAction::Backspace => self.view.backspace(),
            AppAction::Delete => {
                if !self.view.is_typing() {
                    self.delete_selected()?;
                }
            }
            AppAction::Up => {
                if !self.view.is_editing() {
                    self.view.select_prev();
                }
            }
            AppAction::Down => {
                if !self.view.is_editing() {
                    self.view.select_next();
                }
            }
            AppAction::Input(ch) if self.view.is_typing() => self.view.type_char(ch),
            AppAction::Input(ch) => self.handle_row_command(ch)?,
            AppAction::None => {}
        }

        Ok(())
    }

    fn handle_row_command(&mut self, ch: char) -> Result<()> {
        match ch {
            'e' => {
                self.view.focus_row_field(RowField::Description);
            }
            'a' => {
                self.view.focus_row_field(RowField::Amount);
            }
            'x' => self.delete_selected()?,
            'q' => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }

    fn delete_selected(&mut self) -> Result<()> {
        if let Some(entry) = self.view.delete_selected(&mut self.collection)? {
            self.status = Some(format!("Deleted \"{}\".", entry.description()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::*;

    fn local_config() -> AppConfig {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_stores");
        AppConfig {
            store_path: root
                .join(format!("app_{}.json", Uuid::new_v4()))
                .to_string_lossy()
                .into_owned(),
            ..AppConfig::default()
        }
    }

    fn press(app: &mut App, code: crossterm::event::KeyCode) {
        let key = KeyEvent::new(code, crossterm::event::KeyModifiers::NONE);
        app.handle_key(key).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, crossterm::event::KeyCode::Char(ch));
        }
    }

    fn legacy(description: &str, amount: f64, date: &str) -> LegacyEntry {
        LegacyEntry {
            description: description.to_string(),
            amount,
            date: date.to_string(),
        }
    }

    #[test]
    fn remote_records_seed_a_session_ledger() {
        let records = vec![
            legacy("Coffee", 2.99, "2011-01-05"),
            legacy("Rent", 500.0, "2011-02-30"),
        ];
        let collection = remote_collection(records).unwrap();
        let mut app = App::with_collection(collection, "remote".to_string()).unwrap();

        let mut out = Vec::new();
        app.print(&mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("1/5/2011"), "{printed}");
        assert!(printed.contains("3/2/2011"), "{printed}");
        assert!(printed.ends_with("Total: 502.99\n"), "{printed}");

        press(&mut app, crossterm::event::KeyCode::Esc);
        press(&mut app, crossterm::event::KeyCode::Char('x'));
        assert_eq!(app.collection.total(), 500.0);
        assert_eq!(app.view.state().rows.len(), 1);
    }

    #[test]
    fn malformed_remote_dates_fail_the_load() {
        let records = vec![legacy("Coffee", 2.99, "yesterday")];
        assert!(matches!(
            remote_collection(records),
            Err(AppError::Engine(engine::EngineError::InvalidDate(_)))
        ));
    }

    #[tokio::test]
    async fn keys_drive_the_ledger_and_persist() {
        use crossterm::event::KeyCode;

        let config = local_config();
        let mut app = App::start(&config).await.unwrap();

        type_text(&mut app, "Coffee");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2.99");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status.as_deref(), Some("Entry added."));

        press(&mut app, KeyCode::Esc);
        type_text(&mut app, "a");
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "5");
        press(&mut app, KeyCode::Enter);

        let mut out = Vec::new();
        app.print(&mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("2.95  Coffee"), "{printed}");
        assert!(printed.ends_with("Total: 2.95\n"), "{printed}");

        let reopened = App::start(&config).await.unwrap();
        assert_eq!(reopened.collection.total(), 2.95);

        press(&mut app, KeyCode::Char('x'));
        assert!(app.collection.is_empty());
        type_text(&mut app, "q");
        assert!(app.should_quit);
    }
}
