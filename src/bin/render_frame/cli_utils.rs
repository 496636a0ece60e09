use bevy::math::Vec2;
use shoreline::render::LayerKind;
use shoreline::{ShorelineError, ShorelineResult};
use std::path::{Path, PathBuf};

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
    parser: impl Fn(&str) -> Result<T, std::num::ParseFloatError>,
) -> ShorelineResult<[T; N]>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).collect();
    if parts.len() != N {
        return Err(ShorelineError::InvalidRenderSettings {
            reason: format!("Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = parser(part.trim()).map_err(|_| ShorelineError::InvalidRenderSettings {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse frame size string "WIDTHxHEIGHT" in pixels with validation
pub fn parse_size(size_str: &str) -> ShorelineResult<(u32, u32)> {
    let [width, height] = parse_delimited::<f32, 2>(size_str, 'x', "size", |s| s.parse())?;
    let (width, height) = (width as u32, height as u32);

    if width == 0 || height == 0 {
        return Err(ShorelineError::InvalidRenderSettings {
            reason: "Width and height must be greater than 0".to_string(),
        });
    }

    if width > 8192 || height > 8192 {
        return Err(ShorelineError::InvalidRenderSettings {
            reason: "Width and height must not exceed 8192".to_string(),
        });
    }

    Ok((width, height))
}

/// Parse view origin string "X,Y" in tiles
pub fn parse_origin(origin_str: &str) -> ShorelineResult<Vec2> {
    let [x, y] = parse_delimited::<f32, 2>(origin_str, ',', "origin", |s| s.parse())?;
    Ok(Vec2::new(x, y))
}

/// Parse comma-separated layer names, keeping draw order fixed
pub fn parse_layers(layers_str: &str) -> ShorelineResult<Vec<LayerKind>> {
    let requested = layers_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<LayerKind>)
        .collect::<ShorelineResult<Vec<_>>>()?;
    Ok(LayerKind::ALL.into_iter().filter(|layer| requested.contains(layer)).collect())
}

/// Output path for frame `index` of `count`; numbered only when several
/// frames are written
pub fn frame_path(output: &str, index: u32, count: u32) -> PathBuf {
    let path = Path::new(output);
    if count <= 1 {
        return path.to_path_buf();
    }
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
    path.with_file_name(format!("{stem}_{index:04}.{extension}"))
}
