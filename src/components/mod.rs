use bevy::prelude::*;

/// Sprite that shows the software-rendered frame
#[derive(Component, Debug, Default)]
pub struct RegionSprite;

/// Camera looking at the region sprite
#[derive(Component, Debug, Default)]
pub struct ViewCamera;
