use anyhow::{anyhow, Context};
use eframe::egui;
use line_splitter::progress::{Pass, ProgressSink};
use line_splitter::{RunResult, SplitConfig};
use poll_promise::Promise;
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Line Splitter",
        options,
        Box::new(|_cc| Box::new(SplitGui::default())),
    )
}

struct SplitGui {
    source: String,
    destination: String,
    max_lines: String,
    max_files: String,
    even_split: bool,
    repeat_header: bool,
    count_only: bool,
    status: String,
    logs: Vec<String>,
    processing: bool,
    receiver: Option<Receiver<WorkerMessage>>,
    source_dialog: Option<Promise<Option<PathBuf>>>,
    save_dialog: Option<Promise<Option<PathBuf>>>,
}

impl Default for SplitGui {
    fn default() -> Self {
        Self {
            source: String::new(),
            destination: String::new(),
            max_lines: "1000".into(),
            max_files: "0".into(),
            even_split: false,
            repeat_header: false,
            count_only: false,
            status: "Ready.".into(),
            logs: Vec::new(),
            processing: false,
            receiver: None,
            source_dialog: None,
            save_dialog: None,
        }
    }
}

enum WorkerMessage {
    Log(String),
    Finished(Result<RunResult, String>),
}

impl SplitGui {
    fn poll_worker(&mut self) {
        let mut disconnect = false;
        if let Some(rx) = &self.receiver {
            loop {
                match rx.try_recv() {
                    Ok(WorkerMessage::Log(line)) => {
                        self.logs.push(line);
                        const MAX_LOGS: usize = 500;
                        if self.logs.len() > MAX_LOGS {
                            let drain = self.logs.len() - MAX_LOGS;
                            self.logs.drain(0..drain);
                        }
                    }
                    Ok(WorkerMessage::Finished(result)) => {
                        self.processing = false;
                        self.status = match result {
                            Ok(RunResult::FilesWritten(files)) => {
                                format!("Split complete. {files} files.")
                            }
                            Ok(RunResult::LineCount(lines)) => {
                                format!("Total lines in file {}: {lines}.", self.source.trim())
                            }
                            Err(err) => format!("Error: {err}"),
                        };
                        disconnect = true;
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnect = true;
                        self.processing = false;
                        self.status = "Worker stopped unexpectedly.".into();
                        break;
                    }
                }
            }
        }

        if disconnect {
            self.receiver = None;
        }
    }

    fn poll_dialogs(&mut self) {
        if let Some(Some(path)) = ready_result(&mut self.source_dialog) {
            self.source = path.display().to_string();
        }

        if let Some(Some(path)) = ready_result(&mut self.save_dialog) {
            self.destination = path.display().to_string();
        }
    }

    fn build_config(&self) -> anyhow::Result<SplitConfig> {
        let max_lines = parse_count(&self.max_lines, self.even_split || self.count_only)
            .context("Invalid value for lines per file")?;
        let max_files = parse_count(&self.max_files, true)
            .context("Invalid value for maximum files")?;

        let config = SplitConfig {
            source: PathBuf::from(self.source.trim()),
            destination: PathBuf::from(self.destination.trim()),
            max_lines,
            max_files,
            even_split: self.even_split,
            repeat_header: self.repeat_header,
            count_only: self.count_only,
            quiet: false,
        };
        config.validate()?;
        Ok(config)
    }

    fn start_processing(&mut self) {
        if self.processing {
            self.status = "A split is already running.".into();
            return;
        }

        let config = match self.build_config() {
            Ok(cfg) => cfg,
            Err(err) => {
                self.status = format!("{err:#}");
                return;
            }
        };

        let (tx, rx) = mpsc::channel();
        self.receiver = Some(rx);
        self.logs.clear();
        self.status = "Working...".into();
        self.processing = true;

        thread::spawn(move || {
            let mut progress = GuiProgress::new(tx.clone());
            let result = line_splitter::run_with_progress(&config, &mut progress)
                .map_err(|err| format!("{:#}", anyhow::Error::new(err)));
            let _ = tx.send(WorkerMessage::Finished(result));
        });
    }
}

impl eframe::App for SplitGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        self.poll_dialogs();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Line Splitter");
            ui.label("Pick a source file and a destination name to split it into numbered parts.");

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Source:");
                ui.text_edit_singleline(&mut self.source);
                if ui.button("Browse...").clicked() {
                    self.source_dialog = Some(spawn_open_dialog());
                }
            });

            ui.add_enabled_ui(!self.count_only, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Destination:");
                    ui.text_edit_singleline(&mut self.destination);
                    if ui.button("Choose...").clicked() {
                        let (dir, file) = save_dialog_defaults(&self.destination);
                        self.save_dialog = Some(spawn_save_dialog(dir, file));
                    }
                });
            });

            ui.horizontal(|ui| {
                ui.label("Lines per file:");
                ui.add_enabled(
                    !self.even_split && !self.count_only,
                    egui::TextEdit::singleline(&mut self.max_lines),
                );
                ui.label("Maximum files (0 = all):");
                ui.text_edit_singleline(&mut self.max_files);
            });

            ui.horizontal(|ui| {
                ui.checkbox(&mut self.even_split, "Split evenly");
                ui.checkbox(&mut self.repeat_header, "Repeat header line");
                ui.checkbox(&mut self.count_only, "Count lines only");
            });

            ui.separator();
            ui.horizontal(|ui| {
                let label = if self.count_only { "Count" } else { "Split" };
                if ui
                    .add_enabled(!self.processing, egui::Button::new(label))
                    .clicked()
                {
                    self.start_processing();
                }
                if ui.button("Clear logs").clicked() {
                    self.logs.clear();
                }
            });

            ui.separator();
            ui.label(format!("Status: {}", self.status));

            egui::CollapsingHeader::new("Logs")
                .default_open(true)
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .max_height(200.0)
                        .show(ui, |ui| {
                            for line in &self.logs {
                                ui.label(line);
                            }
                        });
                });
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

/// Empty input means zero when the field does not apply to the chosen mode.
fn parse_count(raw: &str, blank_is_zero: bool) -> anyhow::Result<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return if blank_is_zero {
            Ok(0)
        } else {
            Err(anyhow!("a number is required"))
        };
    }
    trimmed
        .parse::<i64>()
        .with_context(|| format!("{trimmed:?} is not a whole number"))
}

fn ready_result<T: Clone + Send + 'static>(slot: &mut Option<Promise<T>>) -> Option<T> {
    let ready = slot.as_ref().and_then(|promise| promise.ready().cloned());
    if ready.is_some() {
        *slot = None;
    }
    ready
}

fn spawn_open_dialog() -> Promise<Option<PathBuf>> {
    Promise::spawn_thread("pick_source_dialog", || FileDialog::new().pick_file())
}

fn spawn_save_dialog(dir: Option<PathBuf>, file: Option<String>) -> Promise<Option<PathBuf>> {
    Promise::spawn_thread("save_dialog", move || {
        let mut dialog = FileDialog::new();
        if let Some(dir) = dir.as_ref() {
            dialog = dialog.set_directory(dir);
        } else if let Ok(current_dir) = std::env::current_dir() {
            dialog = dialog.set_directory(current_dir);
        }
        if let Some(file) = file.as_ref() {
            dialog = dialog.set_file_name(file);
        }
        dialog.save_file()
    })
}

fn save_dialog_defaults(output: &str) -> (Option<PathBuf>, Option<String>) {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return (None, None);
    }
    let path = PathBuf::from(trimmed);
    let dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .filter(|p| !p.as_os_str().is_empty());
    let file = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|s| s.to_string());
    (dir, file)
}

struct GuiProgress {
    tx: Sender<WorkerMessage>,
    total_lines: u64,
}

impl GuiProgress {
    fn new(tx: Sender<WorkerMessage>) -> Self {
        Self { tx, total_lines: 0 }
    }

    fn log(&self, msg: impl Into<String>) {
        let _ = self.tx.send(WorkerMessage::Log(msg.into()));
    }
}

impl ProgressSink for GuiProgress {
    fn start_pass(&mut self, source: &Path, pass: Pass) {
        self.log(format!("{} {}", pass.label(), source.display()));
    }

    fn on_line(&mut self) {
        self.total_lines += 1;
        if self.total_lines % 100_000 == 0 {
            self.log(format!("Lines copied: {}", self.total_lines));
        }
    }

    fn start_output(&mut self, index: usize, path: &Path) {
        self.log(format!("[{index}] Writing {}", path.display()));
    }

    fn finish_output(&mut self, index: usize, path: &Path, lines: u64) {
        self.log(format!("[{index}] Done {} ({lines} lines)", path.display()));
    }

    fn finish(&mut self, result: &RunResult) {
        match result {
            RunResult::FilesWritten(files) => self.log(format!("{files} file(s) written")),
            RunResult::LineCount(lines) => self.log(format!("{lines} lines counted")),
        }
    }
}
