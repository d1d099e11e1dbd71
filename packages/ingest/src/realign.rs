//! Positional repair for the known-misaligned shelter export.
//!
//! The source file's header reads
//! `address,bookinglink,lat,lon,phonenumber,notes`, but the contents of
//! three columns are shifted one position from their labels:
//!
//! | header        | actual content |
//! |---------------|----------------|
//! | `address`     | address        |
//! | `bookinglink` | booking link   |
//! | `lat`         | phone number   |
//! | `lon`         | latitude       |
//! | `phonenumber` | longitude      |
//! | `notes`       | notes          |
//!
//! This adapter reads from the *shifted* positions to recover the true
//! values. It is tied to this one malformed export: the moment the
//! upstream source is corrected, swap this module out without touching
//! validation or insertion.

/// Column positions in the misaligned export, named for what the
/// columns actually contain rather than what the header claims.
const COL_ADDRESS: usize = 0;
const COL_BOOKING_LINK: usize = 1;
const COL_PHONE: usize = 2; // header says "lat"
const COL_LAT: usize = 3; // header says "lon"
const COL_LON: usize = 4; // header says "phonenumber"
const COL_NOTES: usize = 5;

/// One row with its columns back in their true meaning. Coordinates
/// stay raw strings here; parsing and skip policy belong to the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealignedRow {
    /// Postal address.
    pub address: String,
    /// Booking / more-info URL.
    pub booking_link: String,
    /// Contact phone number (recovered from the "lat" column).
    pub phone_number: String,
    /// Raw latitude text (recovered from the "lon" column).
    pub lat: String,
    /// Raw longitude text (recovered from the "phonenumber" column).
    pub lon: String,
    /// Free-text notes.
    pub notes: String,
}

/// Repairs one record of the misaligned export.
#[must_use]
pub fn realign(record: &csv::StringRecord) -> RealignedRow {
    let field = |index: usize| record.get(index).unwrap_or_default().trim().to_string();

    RealignedRow {
        address: field(COL_ADDRESS),
        booking_link: field(COL_BOOKING_LINK),
        phone_number: field(COL_PHONE),
        lat: field(COL_LAT),
        lon: field(COL_LON),
        notes: field(COL_NOTES),
    }
}
