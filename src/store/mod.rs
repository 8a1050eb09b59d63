/// Daylog storage: locating, bootstrapping and mutating daylog files
///
/// Every operation is load-mutate-persist against the file named by the
/// store's [`StoreContext`]. Indices are validated before anything is written,
/// so a rejected command leaves every file untouched.
///
/// There is no locking: two processes racing on the same daylog can lose an
/// update. Single-user usage makes that acceptable.

use chrono::NaiveDate;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{Config, Settings};
use crate::daylog::{self, Daylog, Task};
use crate::error::{DaylogError, DaylogResult};
use crate::tui::DaylogSelector;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything an operation needs to know about where it is acting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreContext {
    pub storage_dir: PathBuf,
    pub config_file: PathBuf,
    pub active_daylog: PathBuf,
    pub today: NaiveDate,
}

/// How a command names a daylog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaylogRef {
    Today,
    /// Ask the selector to pick among the stored daylogs
    Pick,
    /// A file name under the storage directory, with or without extension
    Named(String),
}

impl DaylogRef {
    pub fn parse(identifier: Option<&str>) -> Self {
        let identifier = identifier.map(str::trim).unwrap_or("");
        if identifier.is_empty() {
            DaylogRef::Pick
        } else if identifier.eq_ignore_ascii_case("today") {
            DaylogRef::Today
        } else {
            DaylogRef::Named(identifier.to_string())
        }
    }
}

/// Snapshot of a daylog for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub path: PathBuf,
    pub date: String,
    pub tasks: Vec<(usize, Task)>,
}

/// A daylog resolved from a [`DaylogRef`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    /// The file did not exist and was seeded while resolving
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub task: Task,
    pub destination: Resolved,
}

pub struct Initialized {
    pub store: DaylogStore,
    /// Daylog seeded during bootstrap, if any
    pub created: Option<PathBuf>,
}

pub struct DaylogStore {
    ctx: StoreContext,
}

impl DaylogStore {
    pub fn new(ctx: StoreContext) -> Self {
        Self { ctx }
    }

    /// Make sure the storage directory, config record and active daylog exist
    ///
    /// Safe to call on every invocation; when everything is already present
    /// nothing is written.
    pub fn ensure_initialized(settings: &Settings, today: NaiveDate) -> DaylogResult<Initialized> {
        fs::create_dir_all(&settings.storage_dir)
            .map_err(|e| DaylogError::io(&settings.storage_dir, e))?;

        let config = match Config::load(&settings.config_file)? {
            Some(config) => config,
            None => {
                let config = Config {
                    daylog_file: today_path(&settings.storage_dir, today),
                };
                config.save(&settings.config_file)?;
                tracing::info!(config = %settings.config_file.display(), "created configuration");
                config
            }
        };

        let store = Self::new(StoreContext {
            storage_dir: settings.storage_dir.clone(),
            config_file: settings.config_file.clone(),
            active_daylog: config.daylog_file,
            today,
        });

        let active = store.ctx.active_daylog.clone();
        let created = store.ensure_daylog(&active)?.then_some(active);

        Ok(Initialized { store, created })
    }

    pub fn context(&self) -> &StoreContext {
        &self.ctx
    }

    pub fn active_daylog(&self) -> &Path {
        &self.ctx.active_daylog
    }

    pub fn today_string(&self) -> String {
        self.ctx.today.format(DATE_FORMAT).to_string()
    }

    pub fn today_path(&self) -> PathBuf {
        today_path(&self.ctx.storage_dir, self.ctx.today)
    }

    /// Seed `path` with a default daylog unless it already exists
    fn ensure_daylog(&self, path: &Path) -> DaylogResult<bool> {
        if path.exists() {
            return Ok(false);
        }
        Daylog::seeded(self.today_string()).write(path)?;
        tracing::info!(path = %path.display(), "created daylog");
        Ok(true)
    }

    pub fn load(&self) -> DaylogResult<Daylog> {
        Daylog::read(&self.ctx.active_daylog)
    }

    /// Load the active daylog, apply `f` and persist only if `f` succeeds
    fn mutate<T>(&self, f: impl FnOnce(&mut Daylog) -> DaylogResult<T>) -> DaylogResult<T> {
        let mut daylog = self.load()?;
        let out = f(&mut daylog)?;
        daylog.write(&self.ctx.active_daylog)?;
        Ok(out)
    }

    /// Append a pending task, returning its index
    pub fn add(&self, title: &str) -> DaylogResult<usize> {
        let index = self.mutate(|d| Ok(d.push(Task::pending(title))))?;
        tracing::debug!(index, title, "task added");
        Ok(index)
    }

    pub fn toggle(&self, indices: &[usize]) -> DaylogResult<()> {
        self.mutate(|d| d.toggle(indices))?;
        tracing::debug!(?indices, "tasks toggled");
        Ok(())
    }

    /// Delete the named tasks; returns them in their original order
    pub fn remove(&self, indices: &[usize]) -> DaylogResult<Vec<Task>> {
        let removed = self.mutate(|d| d.remove(indices))?;
        tracing::debug!(?indices, count = removed.len(), "tasks removed");
        Ok(removed)
    }

    pub fn rename(&self, index: usize, title: &str) -> DaylogResult<()> {
        self.mutate(|d| d.rename(index, title))?;
        tracing::debug!(index, title, "task renamed");
        Ok(())
    }

    pub fn list(&self) -> DaylogResult<Listing> {
        let daylog = self.load()?;
        Ok(Listing {
            path: self.ctx.active_daylog.clone(),
            date: daylog.date,
            tasks: daylog.tasks.into_iter().enumerate().collect(),
        })
    }

    /// Files directly under the storage directory, sorted by name
    pub fn daylog_files(&self) -> DaylogResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.ctx.storage_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.ctx.storage_dir.as_path()).to_path_buf();
                DaylogError::io(path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            // Skips in-flight temp files as well as dotfiles
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            files.push(entry.into_path());
        }
        Ok(files)
    }

    /// Turn a [`DaylogRef`] into an existing daylog file
    pub fn resolve(
        &self,
        target: &DaylogRef,
        selector: &mut dyn DaylogSelector,
    ) -> DaylogResult<Resolved> {
        match target {
            DaylogRef::Today => {
                let path = self.today_path();
                let created = self.ensure_daylog(&path)?;
                Ok(Resolved { path, created })
            }
            DaylogRef::Pick => {
                let options = self.daylog_files()?;
                if options.is_empty() {
                    return Err(DaylogError::NoDaylogs {
                        dir: self.ctx.storage_dir.clone(),
                    });
                }
                let path = selector
                    .select(&options)?
                    .ok_or(DaylogError::SelectionCancelled)?;
                Ok(Resolved {
                    path,
                    created: false,
                })
            }
            DaylogRef::Named(name) => {
                let path = self.lookup_named(name)?;
                Ok(Resolved {
                    path,
                    created: false,
                })
            }
        }
    }

    /// Find `name` directly under the storage directory
    ///
    /// Only a single plain file name is accepted: absolute paths and `..`
    /// segments never leave the storage directory.
    fn lookup_named(&self, name: &str) -> DaylogResult<PathBuf> {
        let unknown = || DaylogError::UnknownDaylog {
            name: name.to_string(),
        };

        let mut components = Path::new(name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(unknown());
        }

        let exact = self.ctx.storage_dir.join(name);
        let with_extension = self
            .ctx
            .storage_dir
            .join(format!("{}.{}", name, daylog::EXTENSION));

        [exact, with_extension]
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(unknown)
    }

    /// Point the active daylog somewhere else and remember it in the config
    pub fn select_daylog(
        &mut self,
        target: &DaylogRef,
        selector: &mut dyn DaylogSelector,
    ) -> DaylogResult<Resolved> {
        let resolved = self.resolve(target, selector)?;

        Config {
            daylog_file: resolved.path.clone(),
        }
        .save(&self.ctx.config_file)?;
        self.ctx.active_daylog = resolved.path.clone();

        tracing::info!(daylog = %resolved.path.display(), "active daylog changed");
        Ok(resolved)
    }

    /// Move the task at `index` from the active daylog to `destination`
    ///
    /// The destination is written first, then the source. The index is
    /// checked before the destination is resolved, so an out-of-range index
    /// touches neither file.
    pub fn move_task(
        &self,
        index: usize,
        destination: &DaylogRef,
        selector: &mut dyn DaylogSelector,
    ) -> DaylogResult<MoveOutcome> {
        let mut source = self.load()?;
        let task = source.get(index)?.clone();

        let resolved = self.resolve(destination, selector)?;

        if same_file(&resolved.path, &self.ctx.active_daylog) {
            let moved = source.remove(&[index])?;
            source.tasks.extend(moved);
            source.write(&self.ctx.active_daylog)?;
        } else {
            let mut target = Daylog::read(&resolved.path)?;
            target.push(task.clone());
            target.write(&resolved.path)?;

            source.remove(&[index])?;
            source.write(&self.ctx.active_daylog)?;
        }

        tracing::info!(
            index,
            title = %task.title,
            destination = %resolved.path.display(),
            "task moved"
        );
        Ok(MoveOutcome {
            task,
            destination: resolved,
        })
    }
}

fn today_path(storage_dir: &Path, today: NaiveDate) -> PathBuf {
    storage_dir.join(format!("{}.{}", today.format(DATE_FORMAT), daylog::EXTENSION))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Picks a fixed position (or cancels) and records what it was offered
    struct ScriptedSelector {
        choice: Option<usize>,
        offered: Vec<PathBuf>,
    }

    impl ScriptedSelector {
        fn picking(choice: usize) -> Self {
            Self {
                choice: Some(choice),
                offered: Vec::new(),
            }
        }

        fn cancelling() -> Self {
            Self {
                choice: None,
                offered: Vec::new(),
            }
        }
    }

    impl DaylogSelector for ScriptedSelector {
        fn select(&mut self, options: &[PathBuf]) -> DaylogResult<Option<PathBuf>> {
            self.offered = options.to_vec();
            Ok(self.choice.map(|i| options[i].clone()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn settings(temp: &TempDir) -> Settings {
        Settings {
            storage_dir: temp.path().join("todo"),
            config_file: temp.path().join("config/config.toml"),
        }
    }

    fn bootstrap(temp: &TempDir) -> DaylogStore {
        DaylogStore::ensure_initialized(&settings(temp), today())
            .unwrap()
            .store
    }

    /// Store whose active daylog holds exactly `titles`, all pending
    fn store_with(temp: &TempDir, titles: &[&str]) -> DaylogStore {
        let store = bootstrap(temp);
        let daylog = Daylog {
            date: "2024-03-15".to_string(),
            tasks: titles.iter().map(|t| Task::pending(*t)).collect(),
        };
        daylog.write(store.active_daylog()).unwrap();
        store
    }

    fn write_daylog(dir: &Path, name: &str, titles: &[&str]) -> PathBuf {
        let path = dir.join(name);
        Daylog {
            date: name.trim_end_matches(".yaml").to_string(),
            tasks: titles.iter().map(|t| Task::pending(*t)).collect(),
        }
        .write(&path)
        .unwrap();
        path
    }

    fn titles(store: &DaylogStore) -> Vec<String> {
        store.load().unwrap().tasks.into_iter().map(|t| t.title).collect()
    }

    #[test]
    fn test_first_run_bootstrap() {
        let temp = TempDir::new().unwrap();
        let settings = settings(&temp);

        let init = DaylogStore::ensure_initialized(&settings, today()).unwrap();
        let expected = settings.storage_dir.join("2024-03-15.yaml");

        assert_eq!(init.created.as_deref(), Some(expected.as_path()));
        assert_eq!(init.store.daylog_files().unwrap(), vec![expected.clone()]);

        let daylog = Daylog::read(&expected).unwrap();
        assert_eq!(daylog.date, "2024-03-15");
        assert_eq!(
            daylog.tasks,
            vec![Task {
                title: "wake up".into(),
                status: true
            }]
        );

        let config = Config::load(&settings.config_file).unwrap().unwrap();
        assert_eq!(config.daylog_file, expected);
    }

    #[test]
    fn test_bootstrap_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = bootstrap(&temp);
        store.add("keep me").unwrap();
        let before = fs::read(store.active_daylog()).unwrap();

        let again = DaylogStore::ensure_initialized(&settings(&temp), today()).unwrap();
        assert!(again.created.is_none());
        assert_eq!(fs::read(again.store.active_daylog()).unwrap(), before);
    }

    #[test]
    fn test_bootstrap_recreates_vanished_active_daylog() {
        let temp = TempDir::new().unwrap();
        let store = bootstrap(&temp);
        fs::remove_file(store.active_daylog()).unwrap();

        let again = DaylogStore::ensure_initialized(&settings(&temp), today()).unwrap();
        assert!(again.created.is_some());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let temp = TempDir::new().unwrap();
        let store = bootstrap(&temp);
        fs::remove_file(store.active_daylog()).unwrap();

        assert!(matches!(store.load(), Err(DaylogError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_daylog_is_not_repaired() {
        let temp = TempDir::new().unwrap();
        let store = bootstrap(&temp);
        fs::write(store.active_daylog(), "tasks: nope\n").unwrap();

        assert!(matches!(store.add("x"), Err(DaylogError::Format { .. })));
        assert_eq!(fs::read_to_string(store.active_daylog()).unwrap(), "tasks: nope\n");
    }

    #[test]
    fn test_add_then_list() {
        let temp = TempDir::new().unwrap();
        let store = bootstrap(&temp);

        assert_eq!(store.add("write tests").unwrap(), 1);
        assert_eq!(store.add("").unwrap(), 2);

        let listing = store.list().unwrap();
        assert_eq!(listing.date, "2024-03-15");
        assert_eq!(listing.tasks.len(), 3);
        assert_eq!(listing.tasks[1], (1, Task::pending("write tests")));
        assert_eq!(listing.tasks[2], (2, Task::pending("")));
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A", "B"]);
        let original = store.load().unwrap();

        store.toggle(&[1]).unwrap();
        assert!(store.load().unwrap().tasks[1].status);

        store.toggle(&[1]).unwrap();
        assert_eq!(store.load().unwrap(), original);
    }

    #[test]
    fn test_toggle_repeated_index_cancels_out() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A", "B"]);
        let original = store.load().unwrap();

        store.toggle(&[1, 1]).unwrap();
        assert_eq!(store.load().unwrap(), original);
    }

    #[test]
    fn test_toggle_many_indices() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A", "B", "C", "D"]);

        store.toggle(&[3, 0, 2]).unwrap();
        let status: Vec<bool> = store.load().unwrap().tasks.iter().map(|t| t.status).collect();
        assert_eq!(status, vec![true, false, true, true]);
    }

    #[test]
    fn test_toggle_out_of_range_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A"]);
        let before = fs::read(store.active_daylog()).unwrap();

        let err = store.toggle(&[0, 3]).unwrap_err();
        assert!(matches!(err, DaylogError::IndexOutOfRange { index: 3, len: 1 }));
        assert_eq!(fs::read(store.active_daylog()).unwrap(), before);
    }

    #[test]
    fn test_remove_single_keeps_order() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A", "B", "C"]);

        store.remove(&[1]).unwrap();
        assert_eq!(titles(&store), vec!["A", "C"]);
    }

    #[test]
    fn test_remove_many_in_any_order() {
        for indices in [[1, 3], [3, 1]] {
            let temp = TempDir::new().unwrap();
            let store = store_with(&temp, &["A", "B", "C", "D"]);

            let removed = store.remove(&indices).unwrap();
            assert_eq!(titles(&store), vec!["A", "C"]);
            assert_eq!(removed, vec![Task::pending("B"), Task::pending("D")]);
        }
    }

    #[test]
    fn test_remove_out_of_range_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A", "B"]);

        assert!(store.remove(&[0, 2]).is_err());
        assert_eq!(titles(&store), vec!["A", "B"]);
    }

    #[test]
    fn test_rename() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A", "B"]);

        store.rename(1, "Bee").unwrap();
        assert_eq!(titles(&store), vec!["A", "Bee"]);
        assert!(matches!(
            store.rename(2, "nope"),
            Err(DaylogError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_daylog_files_skip_hidden_and_directories() {
        let temp = TempDir::new().unwrap();
        let store = bootstrap(&temp);
        let dir = store.context().storage_dir.clone();
        write_daylog(&dir, "2024-03-01.yaml", &[]);
        fs::write(dir.join(".2024-03-01.yaml.tmp"), "partial").unwrap();
        fs::create_dir(dir.join("archive")).unwrap();

        let names: Vec<String> = store
            .daylog_files()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["2024-03-01.yaml", "2024-03-15.yaml"]);
    }

    #[test]
    fn test_parse_identifier() {
        assert_eq!(DaylogRef::parse(None), DaylogRef::Pick);
        assert_eq!(DaylogRef::parse(Some("  ")), DaylogRef::Pick);
        assert_eq!(DaylogRef::parse(Some("TODAY")), DaylogRef::Today);
        assert_eq!(
            DaylogRef::parse(Some("2024-03-01")),
            DaylogRef::Named("2024-03-01".to_string())
        );
    }

    #[test]
    fn test_select_by_picker_persists_config() {
        let temp = TempDir::new().unwrap();
        let mut store = bootstrap(&temp);
        let dir = store.context().storage_dir.clone();
        let older = write_daylog(&dir, "2024-03-01.yaml", &["old"]);

        let mut selector = ScriptedSelector::picking(0);
        let resolved = store.select_daylog(&DaylogRef::Pick, &mut selector).unwrap();

        assert_eq!(selector.offered.len(), 2);
        assert_eq!(resolved.path, older);
        assert_eq!(store.active_daylog(), older.as_path());
        assert_eq!(titles(&store), vec!["old"]);

        let config = Config::load(&store.context().config_file).unwrap().unwrap();
        assert_eq!(config.daylog_file, older);
    }

    #[test]
    fn test_select_today_creates_missing_daylog() {
        let temp = TempDir::new().unwrap();
        let mut store = bootstrap(&temp);
        let dir = store.context().storage_dir.clone();
        let other = write_daylog(&dir, "2024-03-01.yaml", &["old"]);
        let mut selector = ScriptedSelector::cancelling();
        store
            .select_daylog(&DaylogRef::Named("2024-03-01".into()), &mut selector)
            .unwrap();
        assert_eq!(store.active_daylog(), other.as_path());

        let today = store.today_path();
        fs::remove_file(&today).unwrap();

        let resolved = store
            .select_daylog(&DaylogRef::Today, &mut ScriptedSelector::cancelling())
            .unwrap();
        assert!(resolved.created);
        assert_eq!(resolved.path, today);
        assert_eq!(titles(&store), vec!["wake up"]);
    }

    #[test]
    fn test_select_unknown_name_fails_without_change() {
        let temp = TempDir::new().unwrap();
        let mut store = bootstrap(&temp);
        let before = store.active_daylog().to_path_buf();

        let err = store
            .select_daylog(
                &DaylogRef::Named("1999-01-01".into()),
                &mut ScriptedSelector::cancelling(),
            )
            .unwrap_err();
        assert!(matches!(err, DaylogError::UnknownDaylog { .. }));
        assert_eq!(store.active_daylog(), before.as_path());
    }

    #[test]
    fn test_named_lookup_stays_in_storage_dir() {
        let temp = TempDir::new().unwrap();
        let mut store = bootstrap(&temp);
        let before = store.active_daylog().to_path_buf();
        let outside = write_daylog(temp.path(), "outside.yaml", &["X"]);

        let names = [
            outside.to_string_lossy().to_string(),
            "../outside".to_string(),
            "../outside.yaml".to_string(),
            "./2024-03-15.yaml".to_string(),
        ];
        for name in names {
            let err = store
                .select_daylog(&DaylogRef::Named(name.clone()), &mut ScriptedSelector::cancelling())
                .unwrap_err();
            assert!(matches!(err, DaylogError::UnknownDaylog { .. }), "accepted {}", name);
        }

        assert_eq!(store.active_daylog(), before.as_path());
        let config = Config::load(&store.context().config_file).unwrap().unwrap();
        assert_eq!(config.daylog_file, before);
    }

    #[test]
    fn test_select_cancelled() {
        let temp = TempDir::new().unwrap();
        let mut store = bootstrap(&temp);

        let err = store
            .select_daylog(&DaylogRef::Pick, &mut ScriptedSelector::cancelling())
            .unwrap_err();
        assert!(matches!(err, DaylogError::SelectionCancelled));
    }

    #[test]
    fn test_pick_from_empty_storage() {
        let temp = TempDir::new().unwrap();
        let store = bootstrap(&temp);
        fs::remove_file(store.active_daylog()).unwrap();

        let err = store
            .resolve(&DaylogRef::Pick, &mut ScriptedSelector::picking(0))
            .unwrap_err();
        assert!(matches!(err, DaylogError::NoDaylogs { .. }));
    }

    #[test]
    fn test_move_task_to_other_daylog() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A", "B", "C"]);
        store.toggle(&[1]).unwrap();
        let dir = store.context().storage_dir.clone();
        let dest = write_daylog(&dir, "2024-03-16.yaml", &["X"]);

        let outcome = store
            .move_task(
                1,
                &DaylogRef::Named("2024-03-16.yaml".into()),
                &mut ScriptedSelector::cancelling(),
            )
            .unwrap();

        assert_eq!(outcome.task, Task { title: "B".into(), status: true });
        assert_eq!(outcome.destination.path, dest);
        assert_eq!(titles(&store), vec!["A", "C"]);

        let dest_log = Daylog::read(&dest).unwrap();
        assert_eq!(dest_log.tasks.len(), 2);
        assert_eq!(dest_log.tasks[1], Task { title: "B".into(), status: true });
    }

    #[test]
    fn test_move_task_via_picker() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A"]);
        let dir = store.context().storage_dir.clone();
        let dest = write_daylog(&dir, "2024-03-01.yaml", &[]);

        store.move_task(0, &DaylogRef::Pick, &mut ScriptedSelector::picking(0)).unwrap();

        assert!(titles(&store).is_empty());
        assert_eq!(Daylog::read(&dest).unwrap().tasks, vec![Task::pending("A")]);
    }

    #[test]
    fn test_move_out_of_range_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A", "B"]);
        let dir = store.context().storage_dir.clone();
        let dest = write_daylog(&dir, "2024-03-01.yaml", &["X"]);
        let source_before = fs::read(store.active_daylog()).unwrap();
        let dest_before = fs::read(&dest).unwrap();

        let mut selector = ScriptedSelector::picking(0);
        let err = store.move_task(2, &DaylogRef::Pick, &mut selector).unwrap_err();

        assert!(matches!(err, DaylogError::IndexOutOfRange { index: 2, len: 2 }));
        assert!(err.is_recoverable());
        assert!(selector.offered.is_empty());
        assert_eq!(fs::read(store.active_daylog()).unwrap(), source_before);
        assert_eq!(fs::read(&dest).unwrap(), dest_before);
    }

    #[test]
    fn test_move_out_of_range_does_not_create_today() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A"]);
        let dir = store.context().storage_dir.clone();
        let other = write_daylog(&dir, "2024-03-01.yaml", &["X"]);
        let store = DaylogStore::new(StoreContext {
            active_daylog: other,
            ..store.context().clone()
        });
        fs::remove_file(store.today_path()).unwrap();

        assert!(store
            .move_task(5, &DaylogRef::Today, &mut ScriptedSelector::cancelling())
            .is_err());
        assert!(!store.today_path().exists());
    }

    #[test]
    fn test_move_into_same_daylog_moves_to_end() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A", "B", "C"]);

        store
            .move_task(0, &DaylogRef::Today, &mut ScriptedSelector::cancelling())
            .unwrap();
        assert_eq!(titles(&store), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_move_into_malformed_destination_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &["A"]);
        let dir = store.context().storage_dir.clone();
        fs::write(dir.join("broken.yaml"), "date: [").unwrap();
        let before = fs::read(store.active_daylog()).unwrap();

        let err = store
            .move_task(0, &DaylogRef::Named("broken".into()), &mut ScriptedSelector::cancelling())
            .unwrap_err();
        assert!(matches!(err, DaylogError::Format { .. }));
        assert_eq!(fs::read(store.active_daylog()).unwrap(), before);
    }
}
