use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::SessionSettings;
use crate::platform::{Platform, PlatformKind, PlatformTag};

/// Distance of the starter platform's top above the bottom screen edge.
const STARTER_OFFSET: f32 = 50.0;
/// Number of horizontal sections platforms round-robin across.
const SECTIONS: u32 = 3;

/// What changed during one [`Map::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapUpdate {
    pub culled: usize,
    pub generated: usize,
    /// Moving platforms that bounced off a screen edge this tick.
    pub reflected_ids: Vec<u64>,
}

/// Debug readout of the platform set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapStats {
    pub count: usize,
    pub highest_y: Option<f32>,
    pub lowest_y: Option<f32>,
}

/// The world generator. Sole owner and writer of the platform set.
#[derive(Debug, Clone)]
pub struct Map {
    platforms: Vec<Platform>,
    next_id: u64,
    rng: StdRng,
    settings: SessionSettings,
    vertical_gap: f32,
    target_height: f32,
    total_generated: u64,
}

impl Map {
    pub fn new(settings: SessionSettings, seed: u64) -> Self {
        Self {
            platforms: Vec::new(),
            next_id: 1,
            rng: StdRng::seed_from_u64(seed),
            vertical_gap: settings.vertical_gap,
            target_height: settings.world.target_height,
            settings,
            total_generated: 0,
        }
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn platform_mut(&mut self, idx: usize) -> Option<&mut Platform> {
        self.platforms.get_mut(idx)
    }

    pub fn vertical_gap(&self) -> f32 {
        self.vertical_gap
    }

    pub fn target_height(&self) -> f32 {
        self.target_height
    }

    /// Platforms created since the session started, including culled ones.
    pub fn total_generated(&self) -> u64 {
        self.total_generated
    }

    /// Smallest platform y (the topmost platform), if any.
    pub fn highest_y(&self) -> Option<f32> {
        self.platforms.iter().map(|p| p.y).min_by(f32::total_cmp)
    }

    pub fn stats(&self) -> MapStats {
        MapStats {
            count: self.platforms.len(),
            highest_y: self.highest_y(),
            lowest_y: self.platforms.iter().map(|p| p.y).max_by(f32::total_cmp),
        }
    }

    /// Build the opening layout and return the player's spawn point.
    pub fn generate_initial(&mut self) -> (f32, f32) {
        self.platforms.clear();
        let world = self.settings.world.clone();
        let starter_top = world.screen_height - STARTER_OFFSET;
        let starter_x = (world.screen_width - world.platform_width) / 2.0;
        self.push(
            starter_x,
            starter_top,
            world.platform_width,
            PlatformKind::Regular,
        );

        for i in 0..world.initial_platform_count {
            let y = starter_top - (i + 1) as f32 * self.vertical_gap;
            let x = self.section_x(i % SECTIONS, world.platform_width);
            let kind = self.draw_kind();
            self.push(x, y, world.platform_width, kind);
        }

        tracing::debug!(
            platforms = self.platforms.len(),
            gap = self.vertical_gap,
            "Generated initial layout"
        );
        (
            world.screen_width / 2.0,
            starter_top - self.settings.player.radius,
        )
    }

    /// Advance every platform, cull the ones far below the screen and top
    /// up the world above the camera.
    pub fn update(&mut self, camera_y: f32) -> MapUpdate {
        let screen_width = self.settings.world.screen_width;
        let mut result = MapUpdate::default();
        for platform in &mut self.platforms {
            if platform.update(screen_width) {
                result.reflected_ids.push(platform.id);
            }
        }

        // Screen-space test: more than `cull_margin` below the visible bottom.
        let cull_below =
            camera_y + self.settings.world.screen_height + self.settings.world.cull_margin;
        let before = self.platforms.len();
        self.platforms.retain(|p| p.y <= cull_below);
        result.culled = before - self.platforms.len();
        if result.culled > 0 {
            tracing::debug!(culled = result.culled, cull_below, "Culled platforms");
        }

        let needs_more = match self.highest_y() {
            Some(highest) => highest > camera_y - self.settings.world.generation_buffer,
            None => true,
        };
        if needs_more {
            result.generated = self.generate_more(camera_y);
        }
        result
    }

    /// Add one batch above the highest platform. Candidates that crowd an
    /// existing platform are skipped. Returns how many were added.
    pub fn generate_more(&mut self, camera_y: f32) -> usize {
        let world = self.settings.world.clone();
        let start_y = self
            .highest_y()
            .unwrap_or(camera_y + world.screen_height);

        let mut added = 0;
        for i in 0..world.batch_size {
            let y = start_y - (i + 1) as f32 * self.vertical_gap;
            let width = self
                .rng
                .random_range(world.generated_width_min..=world.generated_width_max);
            let x = self.section_x(i % SECTIONS, width);
            let kind = self.draw_kind();
            if self.overlaps(x, y, width) {
                continue;
            }
            self.push(x, y, width, kind);
            added += 1;
        }

        tracing::debug!(added, start_y, "Generated platform batch");
        added
    }

    /// Remove a platform by id. Returns whether it was present.
    pub fn remove_platform(&mut self, id: u64) -> bool {
        match self.platforms.iter().position(|p| p.id == id) {
            Some(idx) => {
                self.platforms.remove(idx);
                true
            },
            None => false,
        }
    }

    /// Insert a platform directly, bypassing generation. Returns its id.
    pub fn insert(&mut self, x: f32, y: f32, width: f32, kind: PlatformKind) -> u64 {
        self.push(x, y, width, kind)
    }

    fn push(&mut self, x: f32, y: f32, width: f32, kind: PlatformKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.total_generated += 1;
        self.platforms.push(Platform::new(
            id,
            x,
            y,
            width,
            self.settings.world.platform_height,
            kind,
            self.settings.platform,
        ));
        id
    }

    fn overlaps(&self, x: f32, y: f32, width: f32) -> bool {
        let height = self.settings.world.platform_height;
        self.platforms
            .iter()
            .any(|p| (p.y - y).abs() < 2.0 * height && (p.x - x).abs() < width)
    }

    /// Uniform x inside one third of the screen, inset by the padding.
    fn section_x(&mut self, section: u32, width: f32) -> f32 {
        let world = &self.settings.world;
        let section_width = world.screen_width / SECTIONS as f32;
        let min_x = section as f32 * section_width + world.section_padding;
        let max_x = ((section + 1) as f32 * section_width - width - world.section_padding)
            .max(min_x);
        self.rng.random_range(min_x..=max_x)
    }

    fn draw_kind(&mut self) -> PlatformKind {
        let weights = self.settings.weights;
        let roll: f32 = self.rng.random();
        let tag = if roll < weights.regular {
            PlatformTag::Regular
        } else if roll < weights.regular + weights.moving {
            PlatformTag::Moving
        } else if roll < weights.regular + weights.moving + weights.disappearing {
            PlatformTag::Disappearing
        } else if weights.dangerous > 0.0 {
            PlatformTag::Dangerous
        } else {
            // Rounding left a sliver past the last non-zero weight.
            PlatformTag::Regular
        };

        let world = &self.settings.world;
        match tag {
            PlatformTag::Regular => PlatformKind::Regular,
            PlatformTag::Moving => {
                let speed = self
                    .rng
                    .random_range(world.moving_speed_min..=world.moving_speed_max);
                let direction = if self.rng.random::<bool>() { 1 } else { -1 };
                PlatformKind::Moving { speed, direction }
            },
            PlatformTag::Disappearing => PlatformKind::Disappearing {
                jumps_remaining: world.disappearing_jumps,
            },
            PlatformTag::Dangerous => PlatformKind::Dangerous,
        }
    }
}
