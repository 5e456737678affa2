use crate::models::Coordinates;
use std::fmt;

/// Why the client could not obtain a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl GeolocationError {
    /// Map a W3C `GeolocationPositionError.code`
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::Unknown,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => "permission_denied",
            GeolocationError::PositionUnavailable => "position_unavailable",
            GeolocationError::Timeout => "timeout",
            GeolocationError::Unknown => "unknown",
        }
    }

    /// Copy shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => {
                "Location permission denied. Please allow location access."
            }
            GeolocationError::PositionUnavailable => "Location information is unavailable.",
            GeolocationError::Timeout => "Location request timed out.",
            GeolocationError::Unknown => "Unknown error occurred while getting location",
        }
    }
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for GeolocationError {}

/// Display string used when reverse geocoding is unavailable
pub fn coordinate_fallback_address(coords: &Coordinates) -> String {
    format!("Location found ({:.4}, {:.4})", coords.lat, coords.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GeolocationError::from_code(1), GeolocationError::PermissionDenied);
        assert_eq!(GeolocationError::from_code(2), GeolocationError::PositionUnavailable);
        assert_eq!(GeolocationError::from_code(3), GeolocationError::Timeout);
        assert_eq!(GeolocationError::from_code(0), GeolocationError::Unknown);
        assert_eq!(GeolocationError::from_code(42).kind(), "unknown");
    }

    #[test]
    fn test_fallback_address_precision() {
        let coords = Coordinates { lat: 37.774929, lng: -122.419416 };
        assert_eq!(coordinate_fallback_address(&coords), "Location found (37.7749, -122.4194)");
    }
}
