use std::fmt::Debug;

use web_time::Instant;

use gymplan_core::{
    Color, FontWeight, HitRegistry, Rect, Scene, SceneNode, TextAlign, Vec2,
};

pub struct Hud {
    pub inspector_enabled: bool,
    /// Pointer position used to highlight the region it would hit.
    pub hovered: Option<Vec2>,
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    pub metrics: Option<Metrics>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            inspector_enabled: false,
            hovered: None,
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            metrics: None,
        }
    }

    pub fn toggle_inspector(&mut self) {
        self.inspector_enabled = !self.inspector_enabled;
    }

    pub fn set_hovered(&mut self, p: Option<Vec2>) {
        self.hovered = p;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    fn tick(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - a) * self.fps_smooth + a * fps
                };
            }
        }
    }

    /// Status line shown in the overlay.
    pub fn status_line(&self) -> String {
        let mut lines = vec![
            format!("frame: {}", self.frame_count),
            format!("fps: {:.1}", self.fps_smooth),
        ];
        if let Some(m) = &self.metrics {
            lines.push(format!("paint: {:.2} ms", m.paint_ms));
            lines.push(format!("nodes: {}", m.scene_nodes));
            lines.push(format!("hits: {}", m.hit_regions));
        }
        lines.join("  |  ")
    }

    /// Appends the stats line, every hit region's outline and the hovered
    /// region to `scene`.
    pub fn overlay<P: Debug>(&mut self, scene: &mut Scene, hits: &HitRegistry<P>) {
        self.tick();
        let text = self.status_line();
        let bar = Rect::new(0.0, 0.0, 8.0 + text.chars().count() as f32 * 7.0, 22.0);
        scene.push(SceneNode::Rect {
            rect: bar,
            color: Color::from_hex("#000000B0"),
            radius: 0.0,
        });
        scene.push(SceneNode::Text {
            origin: Vec2 { x: 6.0, y: 16.0 },
            text,
            color: Color::from_hex("#AAAAAA"),
            size: 12.0,
            weight: FontWeight::Regular,
            align: TextAlign::Left,
        });

        for region in hits.iter() {
            scene.push(SceneNode::Border {
                rect: region.rect,
                color: Color::from_hex("#FF44AA80"),
                width: 1.0,
                radius: 0.0,
            });
        }

        if let Some(region) = self.hovered.and_then(|p| hits.resolve_region(p)) {
            log::trace!("hovered: {:?}", region.payload);
            scene.push(SceneNode::Border {
                rect: region.rect,
                color: Color::from_hex("#44AAFF"),
                width: 2.0,
                radius: 0.0,
            });
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Metrics {
    pub paint_ms: f32,
    pub scene_nodes: usize,
    pub hit_regions: usize,
}

pub struct Inspector {
    pub hud: Hud,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self { hud: Hud::new() }
    }

    pub fn frame<P: Debug>(&mut self, scene: &mut Scene, hits: &HitRegistry<P>) {
        if self.hud.inspector_enabled {
            self.hud.overlay(scene, hits);
        }
    }
}
