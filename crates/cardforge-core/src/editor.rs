//! The editor state container.
//!
//! [`EditorState`] owns everything the editor needs: the persisted
//! [`CardDocument`], the view, the current selection and gesture, lock mode,
//! queued notices and the bookkeeping for asynchronous collaborators. Every
//! operation is a synchronous method; shells feed it pointer and key events and
//! read it back when rendering.

use crate::autofill::{AutofillClient, AutofillError, parse_reply};
use crate::camera::Camera;
use crate::card::{CardRecords, DesignationConfig, GradeConfig};
use crate::config::EditorConfig;
use crate::document::CardDocument;
use crate::elements::{Element, ElementId, ElementPatch, ShapeType, Side, ZOrderDirection};
use crate::input::{Key, KeyEvent, MouseButton, PointerEvent};
use crate::interaction::{Gesture, GestureUpdate};
use crate::selection::{Selection, hit_test_handles};
use crate::standard::StandardFieldKey;
use crate::style::TextStyle;
use crate::template::{Template, TemplateError};
use crate::upload::{UploadError, UploadTarget, UploadTicket, UploadTracker, prepare_image};
use kurbo::Point;
use std::collections::VecDeque;
use uuid::Uuid;

/// Where new elements are placed.
pub const DEFAULT_INSERT_POSITION: Point = Point::new(20.0, 20.0);

const SCROLL_ZOOM_STEP: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Must be acknowledged before continuing.
    Alert,
    Failure,
    Info,
}

/// A message for the user, drained by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    /// The card being edited.
    pub document: CardDocument,
    pub config: EditorConfig,
    pub camera: Camera,
    /// Cards generated from the form.
    pub records: CardRecords,
    active_side: Side,
    selection: Option<Selection>,
    gesture: Gesture,
    locked: bool,
    inspector_position: Point,
    notices: VecDeque<Notice>,
    uploads: UploadTracker,
    autofill_loading: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            document: CardDocument::new(),
            camera: Camera::from_config(&config),
            records: CardRecords::default(),
            active_side: Side::Front,
            selection: None,
            gesture: Gesture::Idle,
            locked: false,
            inspector_position: config.inspector_position,
            notices: VecDeque::new(),
            uploads: UploadTracker::default(),
            autofill_loading: false,
            config,
        }
    }

    pub fn active_side(&self) -> Side {
        self.active_side
    }

    /// Switch the visible side. Selection and gestures belong to the old side and are dropped.
    pub fn set_active_side(&mut self, side: Side) {
        if side == self.active_side {
            return;
        }
        self.blur();
        self.active_side = side;
        self.clear_selection();
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn inspector_position(&self) -> Point {
        self.inspector_position
    }

    /// The inspector is shown whenever something is selected.
    pub fn inspector_visible(&self) -> bool {
        self.selection.is_some()
    }

    pub fn is_autofill_loading(&self) -> bool {
        self.autofill_loading
    }

    pub fn editing_element(&self) -> Option<ElementId> {
        self.gesture.editing()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection
            .and_then(|s| s.element())
            .and_then(|id| self.document.get_element(id))
    }

    // --- Element model -------------------------------------------------

    /// Insert `element` on the active side (unless it names one) and select it.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        if element.side.is_none() {
            element.side = Some(self.active_side);
        }
        log::debug!("Adding {:?} element {}", element.element_type(), element.id());
        let id = self.document.add_element(element);
        if !self.locked {
            self.select(Selection::Element(id));
        }
        id
    }

    pub fn add_text(&mut self, text: impl Into<String>) -> ElementId {
        self.add_element(Element::text(text, DEFAULT_INSERT_POSITION))
    }

    pub fn add_shape(&mut self, shape_type: ShapeType) -> ElementId {
        self.add_element(Element::shape(shape_type, DEFAULT_INSERT_POSITION))
    }

    pub fn add_image(&mut self, src: impl Into<String>, intrinsic: (u32, u32)) -> ElementId {
        self.add_element(Element::image(src, intrinsic, DEFAULT_INSERT_POSITION))
    }

    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.document.update_element(id, patch)
    }

    /// Remove an element, dropping any selection or gesture that refers to it.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.document.remove_element(id)?;
        if self.selection == Some(Selection::Element(id)) {
            self.selection = None;
        }
        if self.gesture.element() == Some(id) {
            self.gesture = Gesture::Idle;
        }
        log::debug!("Removed element {id}");
        Some(removed)
    }

    pub fn reorder_element(&mut self, id: ElementId, direction: ZOrderDirection) -> bool {
        self.document.reorder(id, direction)
    }

    /// Reorder the selection. Standard fields have a fixed order, so this is a no-op for them.
    pub fn reorder_selected(&mut self, direction: ZOrderDirection) -> bool {
        match self.selection {
            Some(Selection::Element(id)) => self.reorder_element(id, direction),
            _ => false,
        }
    }

    pub fn update_standard_style(&mut self, key: StandardFieldKey, patch: &TextStyle) {
        self.document.standard_styles.update(key, patch);
    }

    /// Apply a style patch to whatever is selected.
    pub fn update_selected_style(&mut self, patch: &TextStyle) -> bool {
        match self.selection {
            Some(Selection::Standard(key)) => {
                self.update_standard_style(key, patch);
                true
            }
            Some(Selection::Element(id)) => {
                self.update_element(id, &ElementPatch::style(patch.clone()))
            }
            None => false,
        }
    }

    pub fn elements_for_side(&self, side: Side) -> Vec<&Element> {
        self.document.elements_for_side(side)
    }

    pub fn paint_order(&self, side: Side) -> Vec<&Element> {
        self.document.paint_order(side)
    }

    pub fn hit_test(&self, side: Side, point: Point) -> Option<ElementId> {
        self.document.hit_test(side, point)
    }

    // --- Selection -----------------------------------------------------

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    /// Clear the selection, closing the inspector.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        if matches!(self.gesture, Gesture::DraggingInspector { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    // --- Pointer and keyboard ------------------------------------------

    /// Dispatch a pointer event (screen coordinates).
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(position),
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::DoubleClick { position } => self.double_click(position),
            PointerEvent::Scroll { position, delta } => {
                if delta.y < 0.0 {
                    self.camera.zoom_at(position, SCROLL_ZOOM_STEP);
                } else if delta.y > 0.0 {
                    self.camera.zoom_at(position, 1.0 / SCROLL_ZOOM_STEP);
                }
            }
        }
    }

    /// Pointer-down on the card: handles, then elements front to back, then
    /// standard fields, else the background.
    pub fn pointer_down(&mut self, screen: Point) {
        let point = self.camera.screen_to_card(screen);

        if let Some(editing) = self.gesture.editing() {
            let inside = self
                .document
                .get_element(editing)
                .is_some_and(|e| e.contains(point, 0.0));
            if inside {
                return;
            }
            self.blur();
        }

        if self.locked {
            return;
        }

        if let Some(gesture) = self.handle_gesture_at(screen, point) {
            log::debug!("Gesture: idle -> {}", gesture.name());
            self.gesture = gesture;
            return;
        }

        if let Some(id) = self.document.hit_test(self.active_side, point) {
            let origin_pos = self.document.get_element(id).map(|e| e.position());
            if let Some(origin_pos) = origin_pos {
                self.select(Selection::Element(id));
                self.gesture = Gesture::Dragging {
                    element: id,
                    origin_pointer: screen,
                    origin_pos,
                };
                log::debug!("Gesture: idle -> dragging {id}");
            }
            return;
        }

        let field =
            StandardFieldKey::for_side(self.active_side).find(|key| key.frame().contains(point));
        match field {
            Some(key) => self.select(Selection::Standard(key)),
            None => self.clear_selection(),
        }
    }

    fn handle_gesture_at(&self, screen: Point, point: Point) -> Option<Gesture> {
        let id = self.selection?.element()?;
        let element = self.document.get_element(id)?;
        if element.side() != self.active_side {
            return None;
        }
        let tolerance = self.config.handle_tolerance / self.camera.zoom;
        let handle = hit_test_handles(element, point, tolerance)?;
        Some(Gesture::Resizing {
            element: id,
            handle,
            origin_pointer: screen,
            origin_size: element.size(),
            origin_pos: element.position(),
            rotation: element.rotation(),
        })
    }

    pub fn pointer_move(&mut self, screen: Point) {
        let Some(update) = self.gesture.track(screen, &self.camera) else {
            return;
        };
        match update {
            GestureUpdate::Move { element, position } => {
                let patch = ElementPatch::position(position.x, position.y);
                self.document.update_element(element, &patch);
            }
            GestureUpdate::Resize { element, position, size } => {
                let patch = ElementPatch {
                    x: Some(position.x),
                    y: Some(position.y),
                    width: Some(size.width),
                    height: Some(size.height),
                    ..Default::default()
                };
                self.document.update_element(element, &patch);
            }
            GestureUpdate::Panel(position) => self.inspector_position = position,
        }
    }

    /// Ends drags and resizes. There is no cancel path; the last move stands.
    pub fn pointer_up(&mut self) {
        if self.gesture.ends_on_pointer_up() {
            log::debug!("Gesture: {} -> idle", self.gesture.name());
            self.gesture = Gesture::Idle;
        }
    }

    pub fn double_click(&mut self, screen: Point) {
        if self.locked {
            return;
        }
        let point = self.camera.screen_to_card(screen);
        if let Some(id) = self.document.hit_test(self.active_side, point) {
            self.begin_edit(id);
        }
    }

    /// Start inline editing of a text element.
    pub fn begin_edit(&mut self, id: ElementId) -> bool {
        if self.locked {
            return false;
        }
        if self.gesture.editing() == Some(id) {
            return true;
        }
        let Some(text) = self.document.get_element(id).and_then(|e| e.as_text()) else {
            return false;
        };
        let draft = text.text.clone();
        self.blur();
        self.select(Selection::Element(id));
        self.gesture = Gesture::EditingText { element: id, draft };
        log::debug!("Gesture: idle -> editing-text {id}");
        true
    }

    /// Replace the text being edited. Returns false when not editing.
    pub fn set_edit_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.gesture {
            Gesture::EditingText { draft, .. } => {
                *draft = text.into();
                true
            }
            _ => false,
        }
    }

    /// Leave text editing, committing the draft into the element.
    pub fn blur(&mut self) {
        if !matches!(self.gesture, Gesture::EditingText { .. }) {
            return;
        }
        if let Gesture::EditingText { element, draft } = std::mem::take(&mut self.gesture) {
            let patch = ElementPatch {
                text: Some(draft),
                ..Default::default()
            };
            self.document.update_element(element, &patch);
            log::debug!("Gesture: editing-text -> idle, committed {element}");
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let KeyEvent::Pressed(Key::Delete) = event {
            self.delete_selected();
        }
    }

    /// Delete the selected element. Ignored while locked or editing text.
    pub fn delete_selected(&mut self) -> bool {
        if self.locked || self.gesture.editing().is_some() {
            return false;
        }
        match self.selection {
            Some(Selection::Element(id)) => self.remove_element(id).is_some(),
            _ => false,
        }
    }

    /// Pointer-down on the inspector header.
    pub fn begin_inspector_drag(&mut self, screen: Point) -> bool {
        if self.locked || !self.inspector_visible() {
            return false;
        }
        self.blur();
        self.gesture = Gesture::DraggingInspector {
            origin_pointer: screen,
            origin_panel: self.inspector_position,
        };
        true
    }

    // --- Lock mode -----------------------------------------------------

    /// Turning lock on commits any text being edited, then clears the selection and gesture.
    pub fn set_locked(&mut self, locked: bool) {
        if locked == self.locked {
            return;
        }
        self.locked = locked;
        if locked {
            self.blur();
            self.selection = None;
            self.gesture = Gesture::Idle;
        }
        log::info!("Lock mode {}", if locked { "on" } else { "off" });
    }

    pub fn toggle_lock(&mut self) {
        self.set_locked(!self.locked);
    }

    // --- Notices -------------------------------------------------------

    pub fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice { level, message: message.into() });
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    // --- Card data, records and lookup tables --------------------------

    /// Store the current form as a new record.
    pub fn generate_record(&mut self) -> Uuid {
        self.records.generate(&self.document.card_data)
    }

    /// Overwrite record `id` with the current form.
    pub fn save_record(&mut self, id: Uuid) -> bool {
        self.records.edit(id, &self.document.card_data)
    }

    /// Copy record `id` into the form.
    pub fn load_record(&mut self, id: Uuid) -> bool {
        match self.records.get(id) {
            Some(record) => {
                self.document.card_data = record.clone();
                true
            }
            None => false,
        }
    }

    pub fn remove_record(&mut self, id: Uuid) -> bool {
        self.records.remove(id).is_some()
    }

    pub fn add_designation(&mut self, title: impl Into<String>, color: impl Into<String>) -> Uuid {
        self.document.designations.add(DesignationConfig::new(title, color))
    }

    pub fn update_designation(
        &mut self,
        id: Uuid,
        title: Option<&str>,
        color: Option<&str>,
    ) -> bool {
        let Some(entry) = self.document.designations.get_mut(id) else {
            return false;
        };
        if let Some(title) = title {
            entry.title = title.to_string();
        }
        if let Some(color) = color {
            entry.color = color.to_string();
        }
        true
    }

    pub fn remove_designation(&mut self, id: Uuid) -> bool {
        self.document.designations.remove(id).is_some()
    }

    pub fn add_grade(&mut self, title: impl Into<String>, text_color: impl Into<String>) -> Uuid {
        self.document.grades.add(GradeConfig::new(title, text_color))
    }

    pub fn update_grade(
        &mut self,
        id: Uuid,
        title: Option<&str>,
        text_color: Option<&str>,
    ) -> bool {
        let Some(entry) = self.document.grades.get_mut(id) else {
            return false;
        };
        if let Some(title) = title {
            entry.title = title.to_string();
        }
        if let Some(color) = text_color {
            entry.text_color = color.to_string();
        }
        true
    }

    pub fn remove_grade(&mut self, id: Uuid) -> bool {
        self.document.grades.remove(id).is_some()
    }

    // --- Uploads -------------------------------------------------------

    pub fn begin_upload(&mut self, target: UploadTarget) -> UploadTicket {
        self.uploads.begin(target)
    }

    /// Complete an upload. Stale tickets are dropped; failures raise a notice.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        bytes: Result<Vec<u8>, UploadError>,
    ) -> bool {
        if !self.uploads.is_current(&ticket) {
            log::debug!("Discarding stale upload for {:?} (token {})", ticket.target, ticket.token);
            return false;
        }
        let prepared = bytes.and_then(|bytes| prepare_image(&bytes));
        let image = match prepared {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Upload for {:?} failed: {e}", ticket.target);
                self.push_notice(NoticeLevel::Failure, format!("Could not load image: {e}"));
                return false;
            }
        };
        match ticket.target {
            UploadTarget::Card(slot) => self.document.images.set(slot, image.src),
            UploadTarget::NewElement => {
                self.add_image(image.src, image.dimensions);
            }
        }
        true
    }

    // --- Autofill ------------------------------------------------------

    /// Mark autofill as running and return the prompt to send.
    pub fn begin_autofill(&mut self) -> String {
        self.autofill_loading = true;
        self.config.autofill_prompt.clone()
    }

    /// Apply an autofill reply. Always clears the loading flag.
    pub fn finish_autofill(&mut self, reply: Result<String, AutofillError>) -> bool {
        self.autofill_loading = false;
        match reply.and_then(|text| parse_reply(&text)) {
            Ok(fields) => {
                self.document.card_data.merge_json(&fields);
                log::info!("Autofill applied {} fields", fields.len());
                self.push_notice(NoticeLevel::Info, "Form filled with generated data");
                true
            }
            Err(e) => {
                log::error!("Autofill failed: {e}");
                self.push_notice(NoticeLevel::Failure, format!("Autofill failed: {e}"));
                false
            }
        }
    }

    /// Run one autofill round trip against `client`.
    pub async fn run_autofill(&mut self, client: &dyn AutofillClient) -> bool {
        let prompt = self.begin_autofill();
        let reply = client.generate(&prompt).await;
        self.finish_autofill(reply)
    }

    // --- Templates -----------------------------------------------------

    pub fn save_template(&self) -> Template {
        Template::capture(&self.document)
    }

    pub fn save_template_json(&self) -> Result<String, TemplateError> {
        let json = self.save_template().to_json()?;
        log::info!("Saved template ({} elements)", self.document.elements.len());
        Ok(json)
    }

    /// Replace the slices carried by `template` and reset transient state.
    fn apply_template(&mut self, template: Template) {
        template.apply_to(&mut self.document);
        self.selection = None;
        self.gesture = Gesture::Idle;
        log::info!("Loaded template ({} elements)", self.document.elements.len());
    }

    /// Parse `json`, ask `confirm` and apply on approval.
    ///
    /// A parse failure raises an alert and leaves the editor untouched.
    pub fn load_template(&mut self, json: &str, confirm: impl FnOnce(&Template) -> bool) -> bool {
        let template = match Template::from_json(json) {
            Ok(template) => template,
            Err(e) => {
                log::error!("Template load failed: {e}");
                self.push_notice(NoticeLevel::Alert, format!("Could not load template: {e}"));
                return false;
            }
        };
        self.offer_template(template, confirm)
    }

    /// Ask `confirm` before replacing the document with an already parsed
    /// template. Every load path goes through here.
    pub fn offer_template(
        &mut self,
        template: Template,
        confirm: impl FnOnce(&Template) -> bool,
    ) -> bool {
        if !confirm(&template) {
            log::info!("Template load cancelled");
            return false;
        }
        self.apply_template(template);
        self.push_notice(NoticeLevel::Info, "Template loaded");
        true
    }
}
