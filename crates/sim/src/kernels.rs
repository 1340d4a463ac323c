//! CPU per-texel kernels.
//!
//! Each kernel transforms one or more source fields into a destination
//! field, texel for texel, using clamp-to-edge neighbor access. The math
//! is identical to the GLSL kernel set in `fluid-engine-core`; this is
//! the reference implementation the property tests pin down.

use fluid_engine_core::{Field, FluidError, Sampling};
use glam::{Vec2, Vec3};

/// Epsilon added to the confinement force length before normalizing.
const CONFINEMENT_EPSILON: f32 = 1e-4;

fn check_dims(a: &Field, b: &Field) -> Result<(), FluidError> {
    if !a.same_dims(b) {
        return Err(FluidError::DimensionMismatch {
            lhs_w: a.width(),
            lhs_h: a.height(),
            rhs_w: b.width(),
            rhs_h: b.height(),
        });
    }
    Ok(())
}

fn check_channels(field: &Field, at_least: usize) -> Result<(), FluidError> {
    if field.channels() < at_least {
        return Err(FluidError::ChannelMismatch {
            lhs: field.channels(),
            rhs: at_least,
        });
    }
    Ok(())
}

/// Curl (vorticity scalar) of the velocity field:
/// `(R.y - L.y) - (T.x - B.x)`.
pub fn curl(velocity: &Field, out: &mut Field) -> Result<(), FluidError> {
    check_dims(velocity, out)?;
    check_channels(velocity, 2)?;

    let (w, h) = (out.width(), out.height());
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as isize, y as isize);
            let l = velocity.get(xi - 1, yi, 1);
            let r = velocity.get(xi + 1, yi, 1);
            let b = velocity.get(xi, yi - 1, 0);
            let t = velocity.get(xi, yi + 1, 0);
            out.set(x, y, 0, (r - l) - (t - b));
        }
    }
    Ok(())
}

/// Vorticity confinement: the normalized gradient of |curl|, scaled by
/// the configured strength and the local signed curl, added to velocity
/// over the timestep.
pub fn vorticity_confinement(
    velocity: &Field,
    curl_field: &Field,
    out: &mut Field,
    curl_strength: f32,
    dt: f32,
) -> Result<(), FluidError> {
    check_dims(velocity, out)?;
    check_dims(curl_field, out)?;
    check_channels(velocity, 2)?;
    check_channels(out, 2)?;

    let (w, h) = (out.width(), out.height());
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as isize, y as isize);
            let l = curl_field.get(xi - 1, yi, 0);
            let r = curl_field.get(xi + 1, yi, 0);
            let b = curl_field.get(xi, yi - 1, 0);
            let t = curl_field.get(xi, yi + 1, 0);
            let c = curl_field.get(xi, yi, 0);

            let mut force = Vec2::new(t.abs() - b.abs(), r.abs() - l.abs());
            force /= force.length() + CONFINEMENT_EPSILON;
            force *= curl_strength * c;

            let vel = Vec2::new(velocity.get(xi, yi, 0), velocity.get(xi, yi, 1));
            let next = vel + force * dt;
            out.set(x, y, 0, next.x);
            out.set(x, y, 1, next.y);
        }
    }
    Ok(())
}

/// Velocity divergence: `(R.x - L.x) + (T.y - B.y)`.
pub fn divergence(velocity: &Field, out: &mut Field) -> Result<(), FluidError> {
    check_dims(velocity, out)?;
    check_channels(velocity, 2)?;

    let (w, h) = (out.width(), out.height());
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as isize, y as isize);
            let l = velocity.get(xi - 1, yi, 0);
            let r = velocity.get(xi + 1, yi, 0);
            let b = velocity.get(xi, yi - 1, 1);
            let t = velocity.get(xi, yi + 1, 1);
            out.set(x, y, 0, (r - l) + (t - b));
        }
    }
    Ok(())
}

/// Scales every channel of `src` by `value` into `out`. Used to
/// dissipate pressure before each solve.
pub fn decay(src: &Field, out: &mut Field, value: f32) -> Result<(), FluidError> {
    check_dims(src, out)?;
    if src.channels() != out.channels() {
        return Err(FluidError::ChannelMismatch {
            lhs: src.channels(),
            rhs: out.channels(),
        });
    }
    for (dst, s) in out.data_mut().iter_mut().zip(src.data().iter()) {
        *dst = s * value;
    }
    Ok(())
}

/// One Jacobi iteration of the pressure Poisson solve:
/// `p' = (L + R + B + T - divergence) / 4`.
pub fn pressure_jacobi(
    pressure: &Field,
    divergence_field: &Field,
    out: &mut Field,
) -> Result<(), FluidError> {
    check_dims(pressure, out)?;
    check_dims(divergence_field, out)?;

    let (w, h) = (out.width(), out.height());
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as isize, y as isize);
            let l = pressure.get(xi - 1, yi, 0);
            let r = pressure.get(xi + 1, yi, 0);
            let b = pressure.get(xi, yi - 1, 0);
            let t = pressure.get(xi, yi + 1, 0);
            let div = divergence_field.get(xi, yi, 0);
            out.set(x, y, 0, (l + r + b + t - div) * 0.25);
        }
    }
    Ok(())
}

/// Subtracts the pressure gradient from velocity, enforcing approximate
/// incompressibility: `vel -= (R - L, T - B)`.
pub fn gradient_subtract(
    pressure: &Field,
    velocity: &Field,
    out: &mut Field,
) -> Result<(), FluidError> {
    check_dims(pressure, out)?;
    check_dims(velocity, out)?;
    check_channels(velocity, 2)?;
    check_channels(out, 2)?;

    let (w, h) = (out.width(), out.height());
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as isize, y as isize);
            let l = pressure.get(xi - 1, yi, 0);
            let r = pressure.get(xi + 1, yi, 0);
            let b = pressure.get(xi, yi - 1, 0);
            let t = pressure.get(xi, yi + 1, 0);
            let grad = Vec2::new(r - l, t - b);
            let vel = Vec2::new(velocity.get(xi, yi, 0), velocity.get(xi, yi, 1));
            let next = vel - grad;
            out.set(x, y, 0, next.x);
            out.set(x, y, 1, next.y);
        }
    }
    Ok(())
}

/// Semi-Lagrangian advection: for every destination texel, trace backward
/// along the local velocity by `dt`, sample `source` there, and apply the
/// dissipation factor. A fourth channel, when present, is forced to 1.
pub fn advect(
    velocity: &Field,
    source: &Field,
    out: &mut Field,
    dt: f32,
    dissipation: f32,
    sampling: Sampling,
) -> Result<(), FluidError> {
    check_dims(velocity, out)?;
    check_dims(source, out)?;
    check_channels(velocity, 2)?;
    if source.channels() != out.channels() {
        return Err(FluidError::ChannelMismatch {
            lhs: source.channels(),
            rhs: out.channels(),
        });
    }

    let (w, h) = (out.width(), out.height());
    let (tx, ty) = out.texel_size();
    let channels = out.channels();
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as isize, y as isize);
            let u = (x as f32 + 0.5) * tx;
            let v = (y as f32 + 0.5) * ty;
            let su = u - dt * velocity.get(xi, yi, 0);
            let sv = v - dt * velocity.get(xi, yi, 1);
            for c in 0..channels {
                out.set(x, y, c, dissipation * source.sample(su, sv, c, sampling));
            }
            if channels == 4 {
                out.set(x, y, 3, 1.0);
            }
        }
    }
    Ok(())
}

/// Adds a Gaussian-falloff impulse centered at the normalized `point`
/// onto `base`, writing the sum into `out`. The offset's x component is
/// scaled by the aspect ratio so splats stay round on non-square grids.
pub fn splat(
    base: &Field,
    out: &mut Field,
    point: Vec2,
    amount: Vec3,
    radius: f32,
    aspect_ratio: f32,
) -> Result<(), FluidError> {
    check_dims(base, out)?;
    if base.channels() != out.channels() {
        return Err(FluidError::ChannelMismatch {
            lhs: base.channels(),
            rhs: out.channels(),
        });
    }

    let (w, h) = (out.width(), out.height());
    let (tx, ty) = out.texel_size();
    let channels = out.channels();
    let amount = [amount.x, amount.y, amount.z];
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as isize, y as isize);
            let u = (x as f32 + 0.5) * tx;
            let v = (y as f32 + 0.5) * ty;
            let mut p = Vec2::new(u, v) - point;
            p.x *= aspect_ratio;
            let falloff = (-p.dot(p) / radius).exp();
            for c in 0..channels.min(3) {
                out.set(x, y, c, base.get(xi, yi, c) + falloff * amount[c]);
            }
            if channels == 4 {
                out.set(x, y, 3, 1.0);
            }
        }
    }
    Ok(())
}
