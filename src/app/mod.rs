use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use km_explorer::archive::{Record, load_collection};
use km_explorer::config::ExplorerConfig;
use km_explorer::explorer::Explorer;
use tracing::{info, warn};

mod canvas;
mod ui;

use canvas::CanvasInput;

const HELP_SEEN_KEY: &str = "km-explorer.help-seen";

type LoadResult = Result<Vec<Record>, String>;

pub struct ExplorerApp {
    records_path: PathBuf,
    config: ExplorerConfig,
    help_seen: bool,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    explorer: Explorer,
    /// Filled by the explorer's selection callback.
    selection: Rc<RefCell<Option<Record>>>,
    search: String,
    matches: Vec<usize>,
    match_rows_visible: usize,
    focus_search: bool,
    show_help: bool,
    canvas: CanvasInput,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl ExplorerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, records_path: PathBuf, config: ExplorerConfig) -> Self {
        let help_seen = cc
            .storage
            .and_then(|storage| storage.get_string(HELP_SEEN_KEY))
            .is_some_and(|value| value == "1");
        let state = Self::start_load(records_path.clone());
        Self {
            records_path,
            config,
            help_seen,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(records_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_collection(&records_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(records_path: PathBuf) -> AppState {
        info!(path = %records_path.display(), "loading collection");
        AppState::Loading {
            rx: Self::spawn_load(records_path),
        }
    }

    fn ready(&mut self, result: LoadResult) -> AppState {
        match result {
            Ok(records) => {
                let show_help = !self.help_seen;
                self.help_seen = true;
                AppState::Ready(Box::new(ViewModel::new(records, self.config.clone(), show_help)))
            }
            Err(error) => {
                warn!(%error, "collection load failed");
                AppState::Error(error)
            }
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut loaded = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => loaded = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading collection...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the collection");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.records_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.records_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.records_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => loaded = Some(result),
                        Err(TryRecvError::Empty) => {
                            ctx.request_repaint();
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = loaded {
            transition = Some(self.ready(result));
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if self.help_seen {
            storage.set_string(HELP_SEEN_KEY, "1".to_owned());
        }
    }
}

impl ViewModel {
    fn new(records: Vec<Record>, config: ExplorerConfig, show_help: bool) -> Self {
        let mut explorer = Explorer::new(records, config);
        let selection = Rc::new(RefCell::new(None));
        let detail = Rc::clone(&selection);
        explorer.set_on_select(move |record: Option<&Record>| {
            *detail.borrow_mut() = record.cloned();
        });

        Self {
            explorer,
            selection,
            search: String::new(),
            matches: Vec::new(),
            match_rows_visible: Self::INITIAL_MATCH_ROWS,
            focus_search: false,
            show_help,
            canvas: CanvasInput::default(),
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }
}
