//! Primary facade for the typesetting core.
//!
//! The UI shell constructs one [`App`], initializes it, and drives every
//! interaction through it. Components are explicit instances wired here,
//! not process-wide globals.

use std::path::Path;
use std::sync::Arc;

use fontpool::{
    ConfigStore, FileConfigStore, FileFontLoader, FileSystem, FontPool, Notifier, Severity,
    TokioFs,
};
use tokio::sync::broadcast;

use crate::bus::{Bus, Notice};
use crate::pages::Project;
use crate::patterns::PatternLibrary;
use crate::preference::{Preference, Publication};
use crate::textlist::TextList;

pub struct App {
    bus: Bus,
    fs: Arc<dyn FileSystem>,
    store: Arc<dyn ConfigStore>,
    fonts: FontPool,
    patterns: PatternLibrary,
    preference: Preference,
    project: Option<Project>,
    text: TextList,
}

impl App {
    /// Builds an app persisting its configuration under `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_store(Arc::new(FileConfigStore::new(data_dir.to_path_buf())))
    }

    /// Builds an app over a caller-provided store. Used by tests and by
    /// shells that bring their own persistence.
    pub fn with_store(store: Arc<dyn ConfigStore>) -> Self {
        let bus = Bus::new(64);
        let fs: Arc<dyn FileSystem> = Arc::new(TokioFs);
        let notifier: Arc<dyn Notifier> = Arc::new(bus.clone());
        Self {
            fonts: FontPool::new(
                Arc::clone(&fs),
                Arc::clone(&store),
                Arc::clone(&notifier),
                Arc::new(FileFontLoader),
            ),
            patterns: PatternLibrary::new(Arc::clone(&fs), Arc::clone(&store), notifier),
            preference: Preference::default(),
            project: None,
            text: TextList::default(),
            bus,
            fs,
            store,
        }
    }

    /// Restores all persisted state. Nothing saved yet is a normal first
    /// start and leaves everything at defaults.
    pub async fn initialize(&mut self) {
        self.preference = Preference::load(self.store.as_ref()).await;
        self.fonts.initialize().await;
        self.patterns.initialize().await;
    }

    /// Releases loaded resources and saves the preferences.
    pub async fn dispose(&mut self) {
        self.preference.save(self.store.as_ref()).await;
        self.fonts.dispose();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.bus.subscribe()
    }

    /// Opens a project directory and loads its script. Failures surface on
    /// the bus and leave the current project in place.
    pub async fn open_project(&mut self, path: &Path, style: Publication) -> bool {
        let project =
            match Project::open(self.fs.as_ref(), &self.preference.general, path, style).await {
                Ok(project) => project,
                Err(err) => {
                    self.bus.report(&err.to_string(), Severity::Error);
                    return false;
                }
            };

        self.text = match TextList::read_file(project.text_path()).await {
            Ok(text) => text,
            Err(err) => {
                log::warn!("project has no readable script: {err}");
                TextList::default()
            }
        };
        self.project = Some(project);
        true
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn next_page(&mut self) {
        if let Some(project) = self.project.as_mut() {
            project.next();
        }
    }

    pub fn back_page(&mut self) {
        if let Some(project) = self.project.as_mut() {
            project.back();
        }
    }

    pub fn go_to_page(&mut self, index: usize) {
        if let Some(project) = self.project.as_mut() {
            project.go_to(index);
        }
    }

    pub fn text(&self) -> &TextList {
        &self.text
    }

    pub fn next_line(&mut self) {
        if !self.text.next() {
            self.bus.report(
                "Cannot go forward; already at the end of the list.",
                Severity::Error,
            );
        }
    }

    pub fn back_line(&mut self) {
        if !self.text.back() {
            self.bus.report(
                "Cannot go back further; already at the beginning of the list.",
                Severity::Error,
            );
        }
    }

    pub fn go_to_line(&mut self, index: usize) {
        if !self.text.go_to(index) {
            let last = self.text.len().saturating_sub(1);
            self.bus.report(
                &format!("Index should be between 0 and {last} inclusive."),
                Severity::Error,
            );
        }
    }

    pub fn fonts(&self) -> &FontPool {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontPool {
        &mut self.fonts
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    pub fn patterns_mut(&mut self) -> &mut PatternLibrary {
        &mut self.patterns
    }

    pub fn preference(&self) -> &Preference {
        &self.preference
    }

    pub fn preference_mut(&mut self) -> &mut Preference {
        &mut self.preference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontpool::MemoryConfigStore;
    use std::fs;
    use tempfile::TempDir;

    fn app(store: Arc<MemoryConfigStore>) -> App {
        App::with_store(store as Arc<dyn ConfigStore>)
    }

    fn project_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("cleaned")).unwrap();
        fs::create_dir(temp.path().join("raw")).unwrap();
        fs::write(temp.path().join("cleaned/1.png"), b"png").unwrap();
        fs::write(temp.path().join("cleaned/2.png"), b"png").unwrap();
        fs::write(temp.path().join("text.txt"), "first\nsecond\n").unwrap();
        temp
    }

    #[tokio::test]
    async fn first_start_initializes_empty() {
        let mut app = app(Arc::new(MemoryConfigStore::new()));
        app.initialize().await;
        assert!(app.fonts().directories().is_empty());
        assert!(app.patterns().directories().is_empty());
        assert_eq!(app.preference(), &Preference::default());
        assert!(app.project().is_none());
    }

    #[tokio::test]
    async fn open_project_loads_pages_and_script() {
        let temp = project_dir();
        let mut app = app(Arc::new(MemoryConfigStore::new()));
        app.initialize().await;

        assert!(app.open_project(temp.path(), Publication::Manga).await);
        let project = app.project().expect("open");
        assert_eq!(project.page_count(), 2);
        assert_eq!(project.style(), Publication::Manga);
        assert_eq!(app.text().len(), 2);
        assert_eq!(app.text().current_line(), Some("first"));
    }

    #[tokio::test]
    async fn open_project_failure_reports_and_keeps_none() {
        let temp = TempDir::new().unwrap();
        let mut app = app(Arc::new(MemoryConfigStore::new()));
        let mut rx = app.subscribe();

        assert!(!app.open_project(temp.path(), Publication::Comic).await);
        assert!(app.project().is_none());

        let notice = rx.recv().await.expect("notice");
        assert_eq!(notice.severity, Severity::Error);
        assert!(notice.message.contains("cleaned"));
    }

    #[tokio::test]
    async fn text_navigation_past_the_end_reports() {
        let temp = project_dir();
        let mut app = app(Arc::new(MemoryConfigStore::new()));
        app.open_project(temp.path(), Publication::Manga).await;
        let mut rx = app.subscribe();

        app.next_line();
        assert_eq!(app.text().current_line(), Some("second"));
        app.next_line();

        let notice = rx.recv().await.expect("notice");
        assert_eq!(notice.severity, Severity::Error);
        assert!(notice.message.contains("end of the list"));
    }

    #[tokio::test]
    async fn preferences_survive_dispose() {
        let store = Arc::new(MemoryConfigStore::new());
        {
            let mut app = app(Arc::clone(&store));
            app.initialize().await;
            app.preference_mut().general.dark_mode = true;
            app.dispose().await;
        }

        let mut restored = app(store);
        restored.initialize().await;
        assert!(restored.preference().general.dark_mode);
    }

    #[tokio::test]
    async fn engine_notifications_surface_on_the_bus() {
        let temp = TempDir::new().unwrap();
        let mut app = app(Arc::new(MemoryConfigStore::new()));
        let mut rx = app.subscribe();

        app.fonts_mut().add_directory(temp.path()).await;
        app.fonts_mut().add_directory(temp.path()).await;

        let notice = rx.recv().await.expect("notice");
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(notice.message, "Already have this directory.");
    }
}
