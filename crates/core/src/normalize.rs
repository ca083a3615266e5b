//! Reconciliation of catalogue rows and metadata matches into output records.

use serde::{Deserialize, Serialize};

use crate::catalogue::CatalogueRow;
use crate::enrich::EnrichedRow;
use crate::metadata::{pick_size, MetadataMatch, ServiceConfig};
use crate::metrics::RECORDS_EMITTED;

/// Overview text used when the metadata service has none.
pub const NO_OVERVIEW: &str = "No overview available.";

/// Base URL of the Criterion film pages, keyed by spine number.
pub const CRITERION_FILM_URL: &str = "https://www.criterion.com/films/";

/// Rating shown when the metadata service has no vote average.
pub const NO_RATING: &str = "N/A";

/// What to do with catalogue rows the metadata service could not match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Leave them out. Pages can come back shorter than requested.
    #[default]
    Drop,
    /// Keep them as catalogue-only records with no images or rating.
    Placeholder,
}

/// Source of an output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Identified by a TMDB movie ID.
    Tmdb,
    /// Catalogue-only record, identified by spine number.
    Catalogue,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Tmdb => "tmdb",
            RecordKind::Catalogue => "catalogue",
        }
    }
}

/// A display-ready record handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Catalogue title; the service's (possibly localized) title is not used.
    pub title: String,
    pub description: String,
    /// Catalogue year.
    pub release_date: String,
    #[serde(rename = "posterPath")]
    pub poster_url: Option<String>,
    #[serde(rename = "backdropPath")]
    pub backdrop_url: Option<String>,
    /// Vote average with one decimal, or `N/A`.
    pub rating: String,
    pub media_type: String,
    /// `director (year)`, when the catalogue has a director.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Criterion film page for the spine number.
    pub url: String,
}

/// Fixed text of the record description, in the metadata language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptionLabels {
    pub director: &'static str,
    pub country: &'static str,
    pub spine: &'static str,
    pub no_overview: &'static str,
}

impl DescriptionLabels {
    pub const ENGLISH: Self = Self {
        director: "Director",
        country: "Country",
        spine: "Spine",
        no_overview: NO_OVERVIEW,
    };

    pub const CHINESE: Self = Self {
        director: "导演",
        country: "国家",
        spine: "CC 编号",
        no_overview: "暂无简介。",
    };

    /// Labels for a metadata language tag such as `zh-CN` or `en-US`.
    ///
    /// Chinese tags get Chinese labels; anything else, or no tag, gets English.
    pub fn for_language(language: Option<&str>) -> Self {
        match language {
            Some(tag) if tag.trim().to_ascii_lowercase().starts_with("zh") => Self::CHINESE,
            _ => Self::ENGLISH,
        }
    }
}

impl Default for DescriptionLabels {
    fn default() -> Self {
        Self::ENGLISH
    }
}

/// Normalization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub unmatched: UnmatchedPolicy,
    /// Preferred poster size token.
    pub poster_size: String,
    /// Preferred backdrop size token.
    pub backdrop_size: String,
    pub labels: DescriptionLabels,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            unmatched: UnmatchedPolicy::default(),
            poster_size: "w500".to_string(),
            backdrop_size: "w780".to_string(),
            labels: DescriptionLabels::default(),
        }
    }
}

/// Map enriched rows to output records, in input order.
pub fn normalize(
    rows: Vec<EnrichedRow>,
    config: &ServiceConfig,
    options: &NormalizeOptions,
) -> Vec<OutputRecord> {
    let poster_size = pick_size(&options.poster_size, &config.poster_sizes);
    let backdrop_size = pick_size(&options.backdrop_size, &config.backdrop_sizes);

    rows.into_iter()
        .filter_map(|enriched| match enriched.matched {
            Some(matched) => Some(matched_record(
                enriched.row,
                matched,
                config,
                poster_size,
                backdrop_size,
                &options.labels,
            )),
            None => match options.unmatched {
                UnmatchedPolicy::Drop => None,
                UnmatchedPolicy::Placeholder => {
                    Some(placeholder_record(enriched.row, &options.labels))
                }
            },
        })
        .inspect(|record| {
            RECORDS_EMITTED
                .with_label_values(&[record.kind.as_str()])
                .inc()
        })
        .collect()
}

fn matched_record(
    row: CatalogueRow,
    matched: MetadataMatch,
    config: &ServiceConfig,
    poster_size: &str,
    backdrop_size: &str,
    labels: &DescriptionLabels,
) -> OutputRecord {
    let image = |size: &str, path: Option<&str>| {
        path.filter(|p| !p.is_empty())
            .map(|p| config.image_url(size, p))
    };

    OutputRecord {
        id: matched.id.to_string(),
        kind: RecordKind::Tmdb,
        description: describe(&row, matched.overview.as_deref(), labels),
        release_date: row.year.clone(),
        poster_url: image(poster_size, matched.poster_path.as_deref()),
        backdrop_url: image(backdrop_size, matched.backdrop_path.as_deref()),
        rating: format_rating(matched.vote_average),
        subtitle: subtitle(&row),
        url: film_url(row.spine),
        title: row.title,
        media_type: "movie".to_string(),
    }
}

fn placeholder_record(row: CatalogueRow, labels: &DescriptionLabels) -> OutputRecord {
    OutputRecord {
        id: format!("criterion.{}", row.spine),
        kind: RecordKind::Catalogue,
        description: describe(&row, None, labels),
        release_date: row.year.clone(),
        poster_url: None,
        backdrop_url: None,
        rating: NO_RATING.to_string(),
        subtitle: subtitle(&row),
        url: film_url(row.spine),
        title: row.title,
        media_type: "movie".to_string(),
    }
}

/// `director (year)`, or just the director when the year is blank.
pub fn subtitle(row: &CatalogueRow) -> Option<String> {
    let director = row.director.trim();
    if director.is_empty() {
        return None;
    }
    match row.year.trim() {
        "" => Some(director.to_string()),
        year => Some(format!("{} ({})", director, year)),
    }
}

/// Criterion film page for a spine number.
pub fn film_url(spine: u32) -> String {
    format!("{}{}", CRITERION_FILM_URL, spine)
}

/// Compose the record description from catalogue fields and the overview.
pub fn describe(row: &CatalogueRow, overview: Option<&str>, labels: &DescriptionLabels) -> String {
    let overview = overview
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .unwrap_or(labels.no_overview);

    format!(
        "{}: {}\n{}: {}\n{}: {}\n\n{}",
        labels.director,
        row.director,
        labels.country,
        row.country,
        labels.spine,
        row.spine,
        overview
    )
}

/// Format a vote average with one decimal place; zero or absent is `N/A`.
pub fn format_rating(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v != 0.0 && v.is_finite() => one_decimal(v),
        _ => NO_RATING.to_string(),
    }
}

// `{:.1}` rounds exact ties to even. Only quarter values (x.25, x.75) can be
// exact ties at one decimal; those round half away from zero instead.
fn one_decimal(v: f64) -> String {
    let quarters = v * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", (v * 10.0).round() / 10.0);
    }
    format!("{:.1}", v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn enriched(row: CatalogueRow, matched: Option<MetadataMatch>) -> EnrichedRow {
        EnrichedRow { row, matched }
    }

    #[test]
    fn test_matched_row() {
        let row = fixtures::catalogue_row(2, "Seven Samurai", "1954");
        let mut matched = fixtures::metadata_match(346, "七武士", 1954);
        matched.vote_average = Some(8.46);
        matched.overview = Some("A film about seven samurai.".to_string());

        let records = normalize(
            vec![enriched(row, Some(matched))],
            &fixtures::service_config(),
            &NormalizeOptions::default(),
        );

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "346");
        assert_eq!(record.kind, RecordKind::Tmdb);
        assert_eq!(record.title, "Seven Samurai");
        assert_eq!(record.release_date, "1954");
        assert_eq!(record.rating, "8.5");
        assert_eq!(record.media_type, "movie");
        assert_eq!(
            record.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert_eq!(
            record.backdrop_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w780/backdrop.jpg")
        );
        assert!(record.description.starts_with("Director: Director of Seven Samurai\n"));
        assert!(record.description.contains("\nSpine: 2\n\n"));
        assert!(record.description.ends_with("A film about seven samurai."));
    }

    #[test]
    fn test_unmatched_row_dropped_by_default() {
        let records = normalize(
            vec![
                enriched(
                    fixtures::catalogue_row(1, "Kept", "1960"),
                    Some(fixtures::metadata_match(1, "Kept", 1960)),
                ),
                enriched(fixtures::catalogue_row(2, "Dropped", "1961"), None),
            ],
            &fixtures::service_config(),
            &NormalizeOptions::default(),
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Kept");
    }

    #[test]
    fn test_unmatched_row_placeholder_policy() {
        let options = NormalizeOptions {
            unmatched: UnmatchedPolicy::Placeholder,
            ..Default::default()
        };
        let records = normalize(
            vec![enriched(fixtures::catalogue_row(7, "The Seventh Seal", "1957"), None)],
            &fixtures::service_config(),
            &options,
        );

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "criterion.7");
        assert_eq!(record.kind, RecordKind::Catalogue);
        assert!(record.poster_url.is_none());
        assert!(record.backdrop_url.is_none());
        assert_eq!(record.rating, NO_RATING);
        assert!(record.description.ends_with(NO_OVERVIEW));
        assert_eq!(record.url, "https://www.criterion.com/films/7");
        assert_eq!(
            record.subtitle.as_deref(),
            Some("Director of The Seventh Seal (1957)")
        );
    }

    #[test]
    fn test_missing_poster_path_is_null() {
        let mut matched = fixtures::metadata_match(5, "Rashomon", 1950);
        matched.poster_path = None;
        matched.backdrop_path = Some(String::new());

        let records = normalize(
            vec![enriched(fixtures::catalogue_row(138, "Rashomon", "1950"), Some(matched))],
            &fixtures::service_config(),
            &NormalizeOptions::default(),
        );

        assert!(records[0].poster_url.is_none());
        assert!(records[0].backdrop_url.is_none());
        assert_eq!(records[0].id, "5");
        assert_eq!(records[0].title, "Rashomon");
        assert_eq!(records[0].rating, "7.5");
    }

    #[test]
    fn test_missing_overview_uses_placeholder_text() {
        let row = fixtures::catalogue_row(1, "Grand Illusion", "1937");
        let labels = DescriptionLabels::ENGLISH;
        assert!(describe(&row, None, &labels).ends_with(NO_OVERVIEW));
        assert!(describe(&row, Some("  "), &labels).ends_with(NO_OVERVIEW));
        assert!(describe(&row, Some("War film."), &labels).ends_with("\n\nWar film."));
    }

    #[test]
    fn test_chinese_description_labels() {
        let row = fixtures::catalogue_row(36, "Ugetsu", "1953");
        let labels = DescriptionLabels::for_language(Some("zh-CN"));

        assert_eq!(
            describe(&row, None, &labels),
            "导演: Director of Ugetsu\n国家: Japan\nCC 编号: 36\n\n暂无简介。"
        );
    }

    #[test]
    fn test_labels_follow_language_tag() {
        assert_eq!(DescriptionLabels::for_language(Some("zh-TW")), DescriptionLabels::CHINESE);
        assert_eq!(DescriptionLabels::for_language(Some("en-US")), DescriptionLabels::ENGLISH);
        assert_eq!(DescriptionLabels::for_language(None), DescriptionLabels::ENGLISH);
    }

    #[test]
    fn test_subtitle_and_film_url() {
        let row = fixtures::catalogue_row(2, "Seven Samurai", "1954");
        assert_eq!(
            subtitle(&row).as_deref(),
            Some("Director of Seven Samurai (1954)")
        );
        assert_eq!(film_url(2), "https://www.criterion.com/films/2");

        let mut undated = row.clone();
        undated.year = String::new();
        assert_eq!(subtitle(&undated).as_deref(), Some("Director of Seven Samurai"));

        let mut anonymous = row;
        anonymous.director = " ".to_string();
        assert_eq!(subtitle(&anonymous), None);
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(Some(7.26)), "7.3");
        assert_eq!(format_rating(Some(8.46)), "8.5");
        assert_eq!(format_rating(Some(10.0)), "10.0");
        assert_eq!(format_rating(Some(0.0)), "N/A");
        assert_eq!(format_rating(None), "N/A");
    }

    #[test]
    fn test_format_rating_rounds_ties_up() {
        assert_eq!(format_rating(Some(7.25)), "7.3");
        assert_eq!(format_rating(Some(7.75)), "7.8");
        assert_eq!(format_rating(Some(0.25)), "0.3");
        assert_eq!(format_rating(Some(6.5)), "6.5");
        assert_eq!(format_rating(Some(9.0)), "9.0");
    }

    #[test]
    fn test_unadvertised_size_falls_back() {
        let mut config = fixtures::service_config();
        config.poster_sizes = vec!["w92".to_string(), "original".to_string()];

        let records = normalize(
            vec![enriched(
                fixtures::catalogue_row(1, "Ugetsu", "1953"),
                Some(fixtures::metadata_match(1, "Ugetsu", 1953)),
            )],
            &config,
            &NormalizeOptions::default(),
        );
        assert_eq!(
            records[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/poster.jpg")
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let record = OutputRecord {
            id: "1".to_string(),
            kind: RecordKind::Tmdb,
            title: "T".to_string(),
            description: "D".to_string(),
            release_date: "1950".to_string(),
            poster_url: None,
            backdrop_url: Some("u".to_string()),
            rating: "N/A".to_string(),
            media_type: "movie".to_string(),
            subtitle: None,
            url: film_url(1),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "tmdb");
        assert_eq!(json["releaseDate"], "1950");
        assert!(json["posterPath"].is_null());
        assert_eq!(json["backdropPath"], "u");
        assert_eq!(json["mediaType"], "movie");
        assert_eq!(json["url"], "https://www.criterion.com/films/1");
        assert!(json.get("subtitle").is_none());
    }
}
