//! The planner engine: owns the plan and all per-surface state, and turns
//! input and dialog answers into mutations, saves and repaints.
//!
//! Every mutation goes through [`Planner::commit`], which persists before it
//! repaints, so the scene and hit regions always describe the saved plan.

use std::sync::Arc;

use gymplan_core::{HitRegistry, Scene, Theme, Viewport};
use gymplan_model::{IdGen, Item, PRESETS, Plan, PlanStore, Week};

use crate::dialog::{Dialog, DialogFlow, Effect, FlowKind, Prompt, Step};
use crate::drag::DragState;
use crate::images::{Fetch, ImageCache, Offline};
use crate::layout::ListLayout;
use crate::metrics::{ApproxMeasure, Metrics, TextMeasure};
use crate::paint::{self, FrameInput, Hit};
use crate::scroll::ScrollController;

pub struct PlannerOptions {
    pub metrics: Metrics,
    pub theme: Theme,
    pub viewport: Viewport,
    pub fetch: Arc<dyn Fetch>,
    pub measure: Box<dyn TextMeasure>,
    /// Id source; seeded generators make runs reproducible.
    pub ids: IdGen,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            metrics: Metrics::default(),
            theme: Theme::default(),
            viewport: Viewport::default(),
            fetch: Arc::new(Offline),
            measure: Box::new(ApproxMeasure),
            ids: IdGen::from_entropy(),
        }
    }
}

/// Primary pointer being followed between down and up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PointerTrack {
    pub id: gymplan_core::PointerId,
    /// Y of the last applied scroll step.
    pub anchor_y: f32,
}

pub struct Planner {
    pub(crate) plan: Plan,
    store: PlanStore,
    pub(crate) metrics: Metrics,
    theme: Theme,
    pub(crate) viewport: Viewport,
    pub(crate) active_week: usize,
    pub(crate) scroll: ScrollController,
    pub(crate) drag: DragState,
    pub(crate) pointer: Option<PointerTrack>,
    pub(crate) hits: HitRegistry<Hit>,
    scene: Scene,
    pub(crate) layout: ListLayout,
    images: ImageCache,
    dialog: Option<DialogFlow>,
    ids: IdGen,
    measure: Box<dyn TextMeasure>,
    frames: u64,
}

impl Planner {
    /// Loads the stored plan (or a default one) and paints the first frame.
    pub fn new(store: PlanStore) -> Self {
        Self::with_options(store, PlannerOptions::default())
    }

    pub fn with_options(store: PlanStore, opts: PlannerOptions) -> Self {
        let plan = store.load_or_default();
        log::info!(
            "planner started with {} weeks, {} items",
            plan.weeks.len(),
            plan.items().count()
        );
        let mut images = ImageCache::new(opts.fetch);
        images.set_icon_colors(opts.theme.background, opts.theme.accent);
        let layout = ListLayout::compute(&Week::new(0), opts.viewport, &opts.metrics, 0.0);
        let mut planner = Self {
            plan,
            store,
            metrics: opts.metrics,
            theme: opts.theme,
            viewport: opts.viewport,
            active_week: 0,
            scroll: ScrollController::new(),
            drag: DragState::Idle,
            pointer: None,
            hits: HitRegistry::new(),
            scene: Scene::default(),
            layout,
            images,
            dialog: None,
            ids: opts.ids,
            measure: opts.measure,
            frames: 0,
        };
        planner.render();
        planner
    }

    // Accessors

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn hits(&self) -> &HitRegistry<Hit> {
        &self.hits
    }

    pub fn layout(&self) -> &ListLayout {
        &self.layout
    }

    pub fn active_week(&self) -> usize {
        self.active_week
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Frames painted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    // Frame

    /// Recomputes the scene and hit regions from the current state.
    pub fn render(&mut self) {
        let assigned = self.plan.ensure_ids(&mut self.ids);
        if assigned > 0 {
            log::debug!("assigned ids to {assigned} items");
            self.store.save_logged(&self.plan);
        }
        let (mut scene, mut layout) = self.paint();
        if self
            .scroll
            .clamp_to(layout.content_height(), layout.viewport_height())
        {
            (scene, layout) = self.paint();
        }
        self.scene = scene;
        self.layout = layout;
        self.frames += 1;
    }

    fn paint(&mut self) -> (Scene, ListLayout) {
        let input = FrameInput {
            plan: &self.plan,
            active_week: self.active_week,
            scroll_offset: self.scroll.offset(),
            viewport: self.viewport,
            metrics: &self.metrics,
            theme: &self.theme,
            drag: &self.drag,
            measure: self.measure.as_ref(),
        };
        paint::render(&input, &mut self.images, &mut self.hits)
    }

    /// Persists, then repaints. Always returns `true`.
    pub(crate) fn commit(&mut self) -> bool {
        self.store.save_logged(&self.plan);
        self.render();
        true
    }

    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!(
            "resize to {}x{} @{}",
            viewport.width,
            viewport.height,
            viewport.scale
        );
        self.viewport = viewport;
        self.render();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.images.set_icon_colors(theme.background, theme.accent);
        self.theme = theme;
        self.render();
    }

    pub fn set_metrics(&mut self, metrics: Metrics) {
        self.metrics = metrics;
        self.render();
    }

    /// Switches week tabs; the list scrolls back to the top.
    pub fn select_week(&mut self, week: usize) -> bool {
        let week = week.min(self.plan.weeks.len().saturating_sub(1));
        log::debug!("select week {week}");
        self.active_week = week;
        self.scroll.reset_to_top();
        self.drag = DragState::Idle;
        self.render();
        true
    }

    pub fn scroll_to_top(&mut self) -> bool {
        self.scroll.reset_to_top();
        self.render();
        true
    }

    /// Scrolls the content by `delta` device pixels; returns whether the
    /// offset moved (and a repaint happened).
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let before = self.scroll.offset();
        self.scroll.scroll_by(
            delta,
            self.layout.content_height(),
            self.layout.viewport_height(),
        );
        if self.scroll.offset() == before {
            return false;
        }
        self.render();
        true
    }

    /// Id of the item at `index` of `day` in the active week.
    pub(crate) fn item_id_at(&self, day: usize, index: usize) -> Option<String> {
        self.plan
            .day(self.active_week, day)?
            .items
            .get(index)
            .map(|i| i.id.clone())
    }

    // Direct mutations

    /// Appends the blank exercise to `day` of the active week.
    pub fn add_blank_item(&mut self, day: usize) -> bool {
        match self
            .plan
            .push_item(self.active_week, day, Item::blank(), &mut self.ids)
        {
            Some(id) => {
                log::info!("added item {id} to day {day}");
                self.commit()
            }
            None => false,
        }
    }

    pub fn toggle_completion(&mut self, id: &str) -> bool {
        let now = self.plan.toggle_completion(id);
        log::debug!("item {id} completed: {now}");
        self.commit()
    }

    /// Moves an item within a day of the active week.
    pub fn reorder(&mut self, day: usize, from: usize, to: usize) -> bool {
        if self.plan.reorder_items(self.active_week, day, from, to) {
            log::info!("moved item {from} -> {to} on day {day}");
            self.commit()
        } else {
            false
        }
    }

    // Dialogs

    pub fn has_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn open_dialog(&mut self, kind: FlowKind) {
        log::debug!("dialog opened: {kind:?}");
        self.dialog = Some(DialogFlow::new(kind));
        // A flow whose target is already gone ends right away.
        if self.prompt().is_none() {
            self.answer_step();
        }
    }

    /// The question currently waiting for an answer.
    pub fn prompt(&self) -> Option<Prompt> {
        match self.dialog.as_ref()?.step(&self.plan) {
            Step::Ask(p) => Some(p),
            _ => None,
        }
    }

    /// Answers the pending prompt; `None` cancels the whole flow. Returns
    /// whether the flow finished with a mutation (and a repaint).
    pub fn answer(&mut self, answer: Option<String>) -> bool {
        let Some(flow) = self.dialog.as_mut() else {
            log::warn!("answer with no dialog open");
            return false;
        };
        if flow.answer(answer).is_none() {
            log::debug!("dialog cancelled: {:?}", flow.kind);
            self.dialog = None;
            return false;
        }
        self.answer_step()
    }

    fn answer_step(&mut self) -> bool {
        while let Some(flow) = self.dialog.as_ref() {
            match flow.step(&self.plan) {
                Step::Ask(_) => return false,
                Step::Switch(kind) => {
                    log::debug!("dialog switched to {kind:?}");
                    self.dialog = Some(DialogFlow::new(kind));
                }
                Step::Abort => {
                    log::debug!("dialog aborted: {:?}", flow.kind);
                    self.dialog = None;
                    return false;
                }
                Step::Apply(effect) => {
                    self.dialog = None;
                    return self.apply(effect);
                }
            }
        }
        false
    }

    pub fn cancel_dialog(&mut self) {
        if self.dialog.take().is_some() {
            log::debug!("dialog cancelled by host");
        }
    }

    /// Drives the pending dialog to completion with a blocking answer source.
    pub fn run_dialog(&mut self, dialog: &mut dyn Dialog) -> bool {
        let mut repainted = false;
        while let Some(prompt) = self.prompt() {
            let answer = dialog.ask(&prompt);
            repainted |= self.answer(answer);
        }
        repainted
    }

    fn apply(&mut self, effect: Effect) -> bool {
        log::debug!("applying {effect:?}");
        match effect {
            Effect::RenameWeek { week, name } => match self.plan.weeks.get_mut(week) {
                Some(w) => {
                    w.name = name;
                    self.commit()
                }
                None => false,
            },
            Effect::UpdateItem {
                id,
                title,
                sets,
                reps,
                weight,
                notes,
            } => match self.plan.item_mut(&id) {
                Some(item) => {
                    item.title = title;
                    item.sets = sets;
                    item.reps = reps;
                    item.weight = weight;
                    item.notes = notes;
                    self.commit()
                }
                None => false,
            },
            Effect::AddItem { week, day, item } => {
                if self.plan.push_item(week, day, item, &mut self.ids).is_none() {
                    return false;
                }
                self.commit()
            }
            Effect::AddPreset { week, day, preset } => {
                let Some(preset) = PRESETS.get(preset) else {
                    return false;
                };
                let mut added = 0;
                for item in preset.instantiate() {
                    if self.plan.push_item(week, day, item, &mut self.ids).is_some() {
                        added += 1;
                    }
                }
                log::info!("added preset '{}' ({added} items) to day {day}", preset.name);
                if added == 0 {
                    return false;
                }
                self.commit()
            }
            Effect::SetImage { id, image } => {
                if !self.plan.set_image(&id, image) {
                    return false;
                }
                self.commit()
            }
            Effect::AcquireImage { id, source } => {
                if let Err(e) = self.images.acquire(&id, source) {
                    log::warn!("could not load image: {e}");
                }
                false
            }
            Effect::DeleteItem { id } => match self.plan.remove_item(&id) {
                Some(item) => {
                    log::info!("deleted item {id} ('{}')", item.title);
                    self.drag = DragState::Idle;
                    self.commit()
                }
                None => false,
            },
        }
    }

    // Images

    /// Applies finished image work. Returns whether a repaint happened.
    pub fn poll_images(&mut self) -> bool {
        let drained = self.images.drain();
        let mut mutated = false;
        for acquired in drained.acquired {
            match acquired.result {
                Ok(data_url) => {
                    match self
                        .plan
                        .attach_stored_image(&acquired.item_id, data_url, &mut self.ids)
                    {
                        Some(store_id) => {
                            log::info!("attached image {store_id} to item {}", acquired.item_id);
                            mutated = true;
                        }
                        None => log::warn!(
                            "image arrived for missing item {}",
                            acquired.item_id
                        ),
                    }
                }
                Err(e) => log::warn!("could not load image for {}: {e}", acquired.item_id),
            }
        }
        if mutated {
            return self.commit();
        }
        if drained.thumbs_ready {
            self.render();
            return true;
        }
        false
    }

    /// Blocks until outstanding image jobs are done, then applies them.
    pub fn settle_images(&mut self, timeout: std::time::Duration) -> bool {
        let mut repainted = false;
        // Applying results can request more thumbnails (a newly attached
        // image), so loop until nothing new arrives.
        loop {
            if !self.images.wait_idle(timeout) {
                log::warn!("image jobs still running after {timeout:?}");
            }
            if !self.poll_images() {
                return repainted;
            }
            repainted = true;
        }
    }
}
