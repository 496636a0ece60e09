use bevy::prelude::*;
use shoreline::config::load_settings;
use shoreline::plugins::*;

fn main() {
    let settings = load_settings();
    let resolution = (settings.window_width, settings.window_height);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Shoreline - Region Viewer".into(),
                resolution: resolution.into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(settings)
        .add_plugins(RegionViewPlugin)
        .run();
}
