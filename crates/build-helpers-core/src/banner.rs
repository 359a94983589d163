//! License/version banner generation.
//!
//! Turns the contents of a `package.json` file into the block comment that
//! gets prepended to a bundle:
//!
//! ```text
//! /**
//!  * https://www.npmjs.com/package/my-lib
//!  * @version 1.2.3
//!  * @license Copyright (c) 2015 - 2023 Kim Doe <kim@example.com>
//!  * SPDX-License-Identifier: MIT
//!  */
//! ```
//!
//! The shape of the block is fixed; downstream tooling matches on it, so
//! spacing and tag text must not change.
//!
//! # Example
//!
//! ```
//! use build_helpers_core::banner::generate_banner;
//! use chrono::{TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
//! let json = r#"{"author":"A","license":"MIT","name":"lib","version":"1.0.0"}"#;
//! let banner = generate_banner(now, json, 2015, false).unwrap();
//! assert!(banner.contains("Copyright (c) 2015 - 2023 A"));
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument};

/// Prefix placed before the package name for packages published to npm.
pub const NPM_PACKAGE_URL: &str = "https://www.npmjs.com/package/";

/// Fields every package file must provide, in validation order.
pub const REQUIRED_FIELDS: [&str; 4] = ["author", "license", "name", "version"];

/// Errors from parsing package metadata.
#[derive(Error, Debug)]
pub enum BannerError {
    /// The package file is not valid JSON.
    #[error("cannot parse packageJson")]
    Malformed(#[source] serde_json::Error),

    /// The package file is valid JSON but not an object.
    #[error("packageJson parses to '{kind}' not 'object'")]
    NotAnObject {
        /// What the document parsed to instead.
        kind: JsonKind,
    },

    /// A required field is absent or not a string.
    #[error("packageJson {field} is type '{kind}' not 'string'")]
    MissingField {
        /// Name of the first offending field.
        field: &'static str,
        /// What the field actually holds.
        kind: JsonKind,
    },
}

/// Result alias for banner operations.
pub type BannerResult<T> = Result<T, BannerError>;

/// The kind of a JSON value, used in error messages.
///
/// `Undefined` stands for a field that is not present at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    /// Field not present.
    Undefined,
    /// `null`.
    Null,
    /// `true` or `false`.
    Boolean,
    /// Any number.
    Number,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

impl JsonKind {
    /// Classify an optional JSON value.
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => Self::Undefined,
            Some(Value::Null) => Self::Null,
            Some(Value::Bool(_)) => Self::Boolean,
            Some(Value::Number(_)) => Self::Number,
            Some(Value::String(_)) => Self::String,
            Some(Value::Array(_)) => Self::Array,
            Some(Value::Object(_)) => Self::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// The subset of `package.json` that goes into a banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    /// Copyright holder, e.g. `Kim Doe <kim@example.com>`.
    pub author: String,
    /// SPDX license identifier.
    pub license: String,
    /// Package name.
    pub name: String,
    /// Package version. Not required to be valid semver.
    pub version: String,
}

impl PackageMetadata {
    /// Parse and validate package metadata from JSON text.
    ///
    /// Fields are checked in the order `author`, `license`, `name`,
    /// `version`; the first one that is missing or not a string is reported.
    /// Other fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BannerError`] if the text is not JSON, is not a JSON object,
    /// or lacks one of the required string fields.
    pub fn from_json(package_json: &str) -> BannerResult<Self> {
        let value: Value = serde_json::from_str(package_json).map_err(BannerError::Malformed)?;
        let obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(BannerError::NotAnObject {
                    kind: JsonKind::of(Some(&other)),
                });
            }
        };

        let [author, license, name, version] = REQUIRED_FIELDS;
        Ok(Self {
            author: string_field(&obj, author)?,
            license: string_field(&obj, license)?,
            name: string_field(&obj, name)?,
            version: string_field(&obj, version)?,
        })
    }

    /// The version as semver, if it parses as one.
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.version).ok()
    }
}

impl FromStr for PackageMetadata {
    type Err = BannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

fn string_field(obj: &Map<String, Value>, field: &'static str) -> BannerResult<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(BannerError::MissingField {
            field,
            kind: JsonKind::of(other),
        }),
    }
}

/// The copyright years shown in a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearRange {
    /// Only the current year, e.g. `2023`.
    Single(i32),
    /// First commit year through the current year, e.g. `2015 - 2023`.
    Span {
        /// Year of the first commit.
        first: u32,
        /// The current year.
        last: i32,
    },
}

impl YearRange {
    /// Build a range from a first-commit year (`0` = unknown) and the current year.
    pub fn new(first_commit_year: u32, current_year: i32) -> Self {
        if first_commit_year == 0 || i64::from(first_commit_year) == i64::from(current_year) {
            Self::Single(current_year)
        } else {
            Self::Span {
                first: first_commit_year,
                last: current_year,
            }
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(year) => write!(f, "{year}"),
            Self::Span { first, last } => write!(f, "{first} - {last}"),
        }
    }
}

/// Render the banner block for already-validated metadata.
pub fn render_banner(metadata: &PackageMetadata, years: YearRange, is_npm: bool) -> String {
    let prefix = if is_npm { NPM_PACKAGE_URL } else { "" };
    [
        "/**".to_string(),
        format!(" * {prefix}{}", metadata.name),
        format!(" * @version {}", metadata.version),
        format!(" * @license Copyright (c) {years} {}", metadata.author),
        format!(" * SPDX-License-Identifier: {}", metadata.license),
        " */".to_string(),
    ]
    .join("\n")
}

/// Everything needed to produce one banner.
#[derive(Debug, Clone, Copy)]
pub struct BannerRequest<'a> {
    /// The current time; only its UTC year is used.
    pub now: DateTime<Utc>,
    /// Contents of a `package.json` file.
    pub package_json: &'a str,
    /// Year of the first commit, `0` if unknown.
    pub first_commit_year: u32,
    /// Prefix the package name with its npmjs.com URL.
    pub is_npm: bool,
}

impl<'a> BannerRequest<'a> {
    /// A request with no first-commit year and no npm prefix.
    pub const fn new(now: DateTime<Utc>, package_json: &'a str) -> Self {
        Self {
            now,
            package_json,
            first_commit_year: 0,
            is_npm: false,
        }
    }

    /// Set the first-commit year (`0` = unknown).
    #[must_use]
    pub const fn with_first_commit_year(mut self, year: u32) -> Self {
        self.first_commit_year = year;
        self
    }

    /// Set whether the package is published to npm.
    #[must_use]
    pub const fn npm(mut self, is_npm: bool) -> Self {
        self.is_npm = is_npm;
        self
    }

    /// Validate the package metadata and render the banner.
    ///
    /// # Errors
    ///
    /// See [`PackageMetadata::from_json`].
    #[instrument(skip_all, fields(first_commit_year = self.first_commit_year, is_npm = self.is_npm))]
    pub fn generate(&self) -> BannerResult<String> {
        let metadata = PackageMetadata::from_json(self.package_json)?;
        let years = YearRange::new(self.first_commit_year, self.now.year());
        debug!(name = %metadata.name, %years, "rendering banner");
        Ok(render_banner(&metadata, years, self.is_npm))
    }
}

/// Generate a banner from `package.json` text.
///
/// Shorthand for building a [`BannerRequest`] and calling
/// [`generate`](BannerRequest::generate).
///
/// # Errors
///
/// See [`PackageMetadata::from_json`].
pub fn generate_banner(
    now: DateTime<Utc>,
    package_json: &str,
    first_commit_year: u32,
    is_npm: bool,
) -> BannerResult<String> {
    BannerRequest::new(now, package_json)
        .with_first_commit_year(first_commit_year)
        .npm(is_npm)
        .generate()
}
