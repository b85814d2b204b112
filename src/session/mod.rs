//! The annotation session: one value owning all state of a review or
//! capture run.
//!
//! Input reaches the session as pointer events, keys (or already mapped
//! commands) and loop ticks. Each returns a [`Flow`] telling the driver
//! whether to keep going.

mod config;

pub use config::{CaptureConfig, ReviewConfig};

use std::path::PathBuf;

use log::{debug, info, warn};
use serde::Serialize;

use crate::capture::{CaptureMode, CaptureSession, FrameSource, TickOutcome};
use crate::classes::{ClassList, ClassRef};
use crate::dataset::{DatasetIndex, FIRST_VALID_INDEX};
use crate::editor::CropRectEditor;
use crate::error::RegionlabError;
use crate::geom::ImageSize;
use crate::input::{Command, Key, Mode, PointerButton, PointerEvent};
use crate::label::{LabelCodec, LabelRecord, LabelSchema};
use crate::overlay::Overlay;
use crate::region::RegionStore;

/// Whether the driver loop should continue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Continue,
    /// The operator asked to exit.
    Exit,
    /// The frame source ran dry.
    EndOfStream,
}

impl Flow {
    pub fn is_continue(&self) -> bool {
        matches!(self, Flow::Continue)
    }
}

enum Workspace {
    Review {
        index: DatasetIndex,
        codec: LabelCodec,
        /// `None` once every entry has been purged.
        position: Option<usize>,
        image_path: Option<PathBuf>,
    },
    Capture {
        session: CaptureSession,
        source: Box<dyn FrameSource>,
    },
}

pub struct AnnotationSession {
    classes: ClassList,
    store: RegionStore,
    editor: CropRectEditor,
    selected_class: ClassRef,
    secondary_held: bool,
    workspace: Workspace,
}

impl AnnotationSession {
    /// Opens a review session positioned at the first entry.
    pub fn review(config: ReviewConfig) -> Result<Self, RegionlabError> {
        let classes = ClassList::load(&config.classes_path)?;
        let index = DatasetIndex::scan(&config.images_dir, &config.labels_dir)?;
        if index.is_empty() {
            return Err(RegionlabError::EmptyDataset {
                images_dir: config.images_dir,
                labels_dir: config.labels_dir,
            });
        }

        info!(
            "review {} entries from {} / {} ({} schema, {} classes)",
            index.len(),
            index.images_dir().display(),
            index.labels_dir().display(),
            config.schema,
            classes.len()
        );

        let mut session = Self {
            selected_class: classes.first(),
            store: RegionStore::new(config.schema, ImageSize::default()),
            editor: CropRectEditor::new(),
            secondary_held: false,
            classes,
            workspace: Workspace::Review {
                index,
                codec: LabelCodec::new(config.schema),
                position: None,
                image_path: None,
            },
        };
        session.load_entry(FIRST_VALID_INDEX)?;
        Ok(session)
    }

    /// Opens a capture session and pulls its first frame.
    pub fn capture(
        config: CaptureConfig,
        mut source: Box<dyn FrameSource>,
    ) -> Result<Self, RegionlabError> {
        let classes = ClassList::load(&config.classes_path)?;
        let root = config.resolved_root();
        let capture = CaptureSession::new(&root, config.prefix.as_str(), config.schema)
            .with_class_map(classes.clone());
        capture.ensure_directories()?;

        if config.start_frame > 0 {
            info!("skipping to frame {}", config.start_frame);
            source.skip_to(config.start_frame)?;
        }

        info!(
            "capture into {} with prefix '{}' ({} schema, {} classes)",
            root.display(),
            config.prefix,
            config.schema,
            classes.len()
        );

        let mut session = Self {
            selected_class: classes.first(),
            store: RegionStore::new(config.schema, ImageSize::default()),
            editor: CropRectEditor::new(),
            secondary_held: false,
            classes,
            workspace: Workspace::Capture {
                session: capture,
                source,
            },
        };

        if let Workspace::Capture { session: capture, source } = &mut session.workspace {
            if !capture.pull_frame(source.as_mut(), &mut session.store)? {
                warn!("frame source produced no frames");
            }
        }
        Ok(session)
    }

    pub fn mode(&self) -> Mode {
        match self.workspace {
            Workspace::Review { .. } => Mode::Review,
            Workspace::Capture { .. } => Mode::Capture,
        }
    }

    pub fn schema(&self) -> LabelSchema {
        self.store.schema()
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn editor(&self) -> &CropRectEditor {
        &self.editor
    }

    pub fn selected_class(&self) -> &ClassRef {
        &self.selected_class
    }

    /// Current review position; `None` in capture mode or after the last
    /// entry was purged.
    pub fn position(&self) -> Option<usize> {
        match &self.workspace {
            Workspace::Review { position, .. } => *position,
            Workspace::Capture { .. } => None,
        }
    }

    pub fn dataset(&self) -> Option<&DatasetIndex> {
        match &self.workspace {
            Workspace::Review { index, .. } => Some(index),
            Workspace::Capture { .. } => None,
        }
    }

    pub fn current_image(&self) -> Option<&PathBuf> {
        match &self.workspace {
            Workspace::Review { image_path, .. } => image_path.as_ref(),
            Workspace::Capture { .. } => None,
        }
    }

    pub fn capture_session(&self) -> Option<&CaptureSession> {
        match &self.workspace {
            Workspace::Capture { session, .. } => Some(session),
            Workspace::Review { .. } => None,
        }
    }

    pub fn capture_mode(&self) -> Option<CaptureMode> {
        self.capture_session().map(CaptureSession::mode)
    }

    pub fn frame_counter(&self) -> Option<u64> {
        self.capture_session().map(CaptureSession::frame_counter)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        debug!("pointer {:?}", event);
        match event {
            PointerEvent::Down(PointerButton::Primary, p) => self.editor.pointer_down(p),
            PointerEvent::Up(PointerButton::Primary, p) => {
                self.editor.pointer_up(p);
            }
            PointerEvent::Down(PointerButton::Secondary, p) => {
                self.store.hit_test(p);
                self.secondary_held = true;
            }
            PointerEvent::Up(PointerButton::Secondary, _) => {
                self.secondary_held = false;
                self.store.release_active();
            }
            PointerEvent::Move(p) => {
                self.editor.pointer_move(p);
                if self.secondary_held {
                    self.store.move_active(p);
                }
            }
        }
    }

    /// Maps a key through the mode's key map and runs the command.
    pub fn handle_key(&mut self, key: Key) -> Result<Flow, RegionlabError> {
        match Command::from_key(self.mode(), key) {
            Some(command) => self.handle_command(command),
            None => {
                debug!("unbound key {:?}", key);
                Ok(Flow::Continue)
            }
        }
    }

    pub fn handle_command(&mut self, command: Command) -> Result<Flow, RegionlabError> {
        debug!("command {:?}", command);
        if !command.applies_to(self.mode()) {
            debug!("{:?} ignored in {:?} mode", command, self.mode());
            return Ok(Flow::Continue);
        }

        match command {
            Command::AddRegion(digit) => self.add_region(digit),
            Command::DeleteSelected => {
                let removed = self.store.delete_selected();
                info!("deleted {} region(s)", removed);
            }
            Command::ClearAll => {
                self.store.clear();
                info!("cleared all regions");
            }
            Command::Exit => return Ok(Flow::Exit),
            Command::Prev => self.step(false)?,
            Command::Next => self.step(true)?,
            Command::Save => self.save()?,
            Command::Purge => self.purge()?,
            Command::ToggleAdvance => {
                if let Workspace::Capture { session, .. } = &mut self.workspace {
                    session.toggle_advance();
                }
            }
            Command::ToggleExport => {
                if let Workspace::Capture { session, .. } = &mut self.workspace {
                    session.toggle_export();
                }
            }
        }

        Ok(Flow::Continue)
    }

    /// One pass of the main loop. Only capture mode does work here.
    pub fn tick(&mut self) -> Result<Flow, RegionlabError> {
        let Workspace::Capture { session, source } = &mut self.workspace else {
            return Ok(Flow::Continue);
        };

        match session.tick(source.as_mut(), &mut self.store)? {
            TickOutcome::EndOfStream => Ok(Flow::EndOfStream),
            TickOutcome::Redraw { .. } => Ok(Flow::Continue),
        }
    }

    pub fn overlay(&self) -> Overlay {
        let status = match &self.workspace {
            Workspace::Review { image_path, .. } => image_path
                .as_ref()
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Workspace::Capture { session, .. } => {
                if session.mode().is_capturing() {
                    "TRAINING ON".to_string()
                } else {
                    "TRAINING OFF".to_string()
                }
            }
        };

        Overlay::build(self.editor.crop(), &self.store, &self.classes, status)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            mode: self.mode(),
            schema: self.schema(),
            class_count: self.classes.len(),
            selected_class: self.selected_class.clone(),
            regions: self.store.len(),
            selected_regions: self.store.selected_count(),
            position: self.position(),
            dataset_entries: self.dataset().map(DatasetIndex::len),
            current_image: self.current_image().cloned(),
            frame_counter: self.frame_counter(),
            capture_mode: self.capture_mode(),
        }
    }

    fn add_region(&mut self, digit: u8) {
        let Some(class) = self.classes.resolve_digit(digit) else {
            warn!(
                "key {} has no class ({} class(es) loaded); ignored",
                digit,
                self.classes.len()
            );
            return;
        };

        if self.store.image_size().is_empty() {
            warn!("no image loaded; region for '{}' ignored", class.name);
            return;
        }

        let crop = self.editor.crop();
        self.store.add(crop, &class);
        info!("added {} region at {:?}", class.name, crop);
        self.selected_class = class;
    }

    fn step(&mut self, forward: bool) -> Result<(), RegionlabError> {
        let Workspace::Review {
            index, position, ..
        } = &self.workspace
        else {
            return Ok(());
        };
        let Some(current) = *position else {
            warn!("no entries left to navigate");
            return Ok(());
        };

        let target = if forward {
            index.next(current)
        } else {
            index.prev(current)
        };
        if target == current {
            debug!("already at position {}", current);
            return Ok(());
        }
        self.load_entry(target)
    }

    fn save(&mut self) -> Result<(), RegionlabError> {
        let Workspace::Review {
            index,
            codec,
            position,
            ..
        } = &self.workspace
        else {
            return Ok(());
        };
        let Some(current) = *position else {
            warn!("no entry to save");
            return Ok(());
        };

        index.export(current, codec, &self.store)?;
        Ok(())
    }

    fn purge(&mut self) -> Result<(), RegionlabError> {
        let Workspace::Review {
            index,
            position,
            image_path,
            ..
        } = &mut self.workspace
        else {
            return Ok(());
        };
        let Some(current) = *position else {
            warn!("no entry to purge");
            return Ok(());
        };

        index.delete(current)?;
        self.store.clear();

        if index.is_empty() {
            info!("dataset is now empty");
            *position = None;
            *image_path = None;
            return Ok(());
        }

        let target = if current > FIRST_VALID_INDEX {
            current - 1
        } else {
            current
        };
        self.load_entry(target)
    }

    /// Imports the entry at `position` into the store.
    fn load_entry(&mut self, target: usize) -> Result<(), RegionlabError> {
        let Workspace::Review {
            index,
            codec,
            position,
            image_path,
        } = &mut self.workspace
        else {
            return Ok(());
        };

        let loaded = index.import(target, codec)?;
        self.store.reset(loaded.image_size);
        for record in loaded.labels.records {
            if let LabelRecord::Normalized(normalized) = &record {
                if normalized.class_index >= self.classes.len() {
                    warn!(
                        "{}: class {} is outside the {} loaded class(es)",
                        loaded.label_path.display(),
                        normalized.class_index,
                        self.classes.len()
                    );
                }
            }
            self.store.insert_record(record);
        }

        *position = Some(target);
        *image_path = Some(loaded.image_path);
        Ok(())
    }
}

/// Snapshot of a session for reporting.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub mode: Mode,
    pub schema: LabelSchema,
    pub class_count: usize,
    pub selected_class: ClassRef,
    pub regions: usize,
    pub selected_regions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_entries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_image: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_counter: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_mode: Option<CaptureMode>,
}
