// crates/core/src/coords.rs
//! Coordinate parsing for user-supplied endpoints.
//!
//! A coordinate is either absolute (`120`) or relative to the player
//! (`~`, `~-8`).

use crate::error::CoordError;
use crate::types::BlockPos;

/// Y level a heading target is placed at.
pub const HEADING_Y: i32 = 64;

/// Parse one axis. `~` means the player's value, `~N` the player's value
/// plus `N`.
pub fn parse_coord(arg: &str, player: i32) -> Result<i32, CoordError> {
    let parse = |s: &str| {
        s.parse::<i32>()
            .map_err(|_| CoordError::InvalidNumber(arg.to_string()))
    };
    match arg.strip_prefix('~') {
        Some("") => Ok(player),
        Some(rest) => player
            .checked_add(parse(rest)?)
            .ok_or_else(|| CoordError::InvalidNumber(arg.to_string())),
        None => parse(arg),
    }
}

pub fn parse_position(x: &str, y: &str, z: &str, player: BlockPos) -> Result<BlockPos, CoordError> {
    Ok(BlockPos::new(
        parse_coord(x, player.x)?,
        parse_coord(y, player.y)?,
        parse_coord(z, player.z)?,
    ))
}

/// Parse `x y z` (start at the player) or `x y z x y z` (explicit start).
pub fn parse_endpoints<S: AsRef<str>>(
    args: &[S],
    player: BlockPos,
) -> Result<(BlockPos, BlockPos), CoordError> {
    let a: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    match a.as_slice() {
        [x0, y0, z0, x1, y1, z1] => Ok((
            parse_position(x0, y0, z0, player)?,
            parse_position(x1, y1, z1, player)?,
        )),
        [x, y, z] => Ok((player, parse_position(x, y, z, player)?)),
        _ => Err(CoordError::ArgCount(a.len())),
    }
}

/// Point `distance` blocks away from `player` along `yaw_degrees`, using the
/// game's yaw convention (0 = +Z, 90 = -X).
pub fn heading_target(player: BlockPos, yaw_degrees: f32, distance: i32) -> BlockPos {
    let theta = yaw_degrees.to_radians() as f64;
    let d = distance as f64;
    let x = player.x as f64 - theta.sin() * d;
    let z = player.z as f64 + theta.cos() * d;
    BlockPos::new(x.floor() as i32, HEADING_Y, z.floor() as i32)
}
