use crate::components::{RegionSprite, ViewCamera};
use crate::render::{PixelCanvas, RegionRenderer};
use crate::resources::{RenderClock, RenderSettings, ViewOrigin};
use crate::world::{CellSource, NoiseWorld, WorldPreset};
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

/// The world being viewed
#[derive(Resource)]
pub struct ActiveWorld(pub Box<dyn CellSource + Send + Sync>);

/// Software renderer plus the image it paints into
#[derive(Resource)]
pub struct RegionView {
    pub renderer: RegionRenderer,
    pub canvas: PixelCanvas,
    pub image: Handle<Image>,
}

/// Direction of the slow camera drift, in tiles
const DRIFT_DIRECTION: Vec2 = Vec2::new(0.93, 0.37);

pub struct RegionViewPlugin;

impl Plugin for RegionViewPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderSettings>()
            .init_resource::<RenderClock>()
            .init_resource::<ViewOrigin>()
            .add_systems(Startup, setup_view)
            .add_systems(Update, (advance_view, sync_settings, render_view).chain());
    }
}

fn setup_view(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    settings: Res<RenderSettings>,
    world: Option<Res<ActiveWorld>>,
) {
    let width = settings.window_width as u32;
    let height = settings.window_height as u32;

    let image = Image::new_fill(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    let handle = images.add(image);

    commands.spawn((Camera2d, ViewCamera));
    commands.spawn((Sprite::from_image(handle.clone()), RegionSprite));

    if world.is_none() {
        let preset = settings.world_preset.parse::<WorldPreset>().unwrap_or_else(|e| {
            warn!("{e}; falling back to the sanctuary preset");
            WorldPreset::Sanctuary
        });
        info!("Viewing procedural {} world with seed {}", preset.as_str(), settings.world_seed);
        commands.insert_resource(ActiveWorld(Box::new(NoiseWorld::new(preset, settings.world_seed))));
    }

    commands.insert_resource(RegionView {
        renderer: RegionRenderer::new(settings.clone()),
        canvas: PixelCanvas::new(width, height),
        image: handle,
    });
    info!("Region view ready at {width}x{height}");
}

fn advance_view(
    time: Res<Time>,
    settings: Res<RenderSettings>,
    mut clock: ResMut<RenderClock>,
    mut origin: ResMut<ViewOrigin>,
) {
    clock.elapsed_ms += time.delta_secs_f64() * 1000.0;
    origin.0 += DRIFT_DIRECTION * settings.drift_speed.get() * time.delta_secs();
}

fn sync_settings(settings: Res<RenderSettings>, view: Option<ResMut<RegionView>>) {
    if let Some(mut view) = view {
        if settings.is_changed() && view.renderer.settings() != &*settings {
            view.renderer.set_settings(settings.clone());
            debug!("Render settings updated");
        }
    }
}

fn render_view(
    view: Option<ResMut<RegionView>>,
    world: Option<Res<ActiveWorld>>,
    clock: Res<RenderClock>,
    origin: Res<ViewOrigin>,
    mut images: ResMut<Assets<Image>>,
) {
    let (Some(mut view), Some(world)) = (view, world) else {
        return;
    };
    let view = &mut *view;

    let viewport = view.renderer.viewport_for(&view.canvas, origin.0);
    view.renderer.render_regions(&mut view.canvas, &*world.0, &viewport, clock.elapsed_ms);

    if let Some(image) = images.get_mut(&view.image) {
        image.data = Some(view.canvas.image().as_raw().clone());
    }
}
