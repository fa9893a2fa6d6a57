//! Geodesic distance on the WGS84 ellipsoid.
//!
//! [`vincenty`] is the workhorse: the Vincenty inverse formula,
//! accurate to well under a millimetre at any distance. It fails soft
//! by returning NaN when the lambda iteration does not converge
//! (nearly antipodal endpoints); callers fall back to [`haversine`].

use trackkit_core::types::TrackPoint;

/// WGS84 semi-major axis in metres.
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 semi-minor axis in metres.
pub const WGS84_B: f64 = 6_356_752.314_245;

/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Mean Earth radius in metres, used by the great-circle fallback.
pub const EARTH_R: f64 = 6_371_000.0;

const MAX_ITERATIONS: usize = 100;
const CONVERGENCE: f64 = 1e-12;

/// Vincenty inverse distance between two track points, in metres.
pub fn vincenty(a: &TrackPoint, b: &TrackPoint) -> f64 {
    vincenty_deg(a.lat, a.lon, b.lat, b.lon)
}

/// Vincenty inverse distance between two coordinates in decimal
/// degrees, in metres.
///
/// Returns 0 for coincident endpoints and NaN when the lambda
/// fixed-point iteration has not converged after 100 rounds.
pub fn vincenty_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let l = (lon2 - lon1).to_radians();
    let u1 = ((1.0 - WGS84_F) * lat1.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * lat2.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 0.0;
    let mut cos_2sigma_m = 0.0;
    let mut converged = false;

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // coincident points
            return 0.0;
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        cos_2sigma_m = if cos_sq_alpha == 0.0 {
            // equatorial line
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
        if (lambda - lambda_prev).abs() <= CONVERGENCE {
            converged = true;
            break;
        }
    }
    if !converged {
        return f64::NAN;
    }

    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = b
        * sin_sigma
        * (cos_2sigma_m
            + b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    WGS84_B * a * (sigma - delta_sigma)
}

/// Great-circle distance between two track points, in metres.
pub fn haversine(a: &TrackPoint, b: &TrackPoint) -> f64 {
    haversine_deg(a.lat, a.lon, b.lat, b.lon)
}

/// Great-circle distance between two coordinates in decimal degrees,
/// in metres, on a sphere of mean Earth radius.
pub fn haversine_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_R * h.sqrt().asin()
}
