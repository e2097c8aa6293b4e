//! The generated "db" table.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    Invoice,
    Refund,
    Transfer,
    Fee,
}

impl Kind {
    const ALL: [Kind; 4] = [Kind::Invoice, Kind::Refund, Kind::Transfer, Kind::Fee];

    pub fn label(self) -> &'static str {
        match self {
            Kind::Invoice => "invoice",
            Kind::Refund => "refund",
            Kind::Transfer => "transfer",
            Kind::Fee => "fee",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub kind: Kind,
    /// Amount in cents.
    pub amount: i64,
    pub updated: NaiveDate,
}

const FIRST: [&str; 12] = [
    "Acme", "Globex", "Initech", "Umbrella", "Stark", "Wayne", "Tyrell", "Cyberdyne", "Soylent",
    "Hooli", "Vandelay", "Wonka",
];
const SECOND: [&str; 8] = [
    "Holdings", "Labs", "Logistics", "Foods", "Systems", "Partners", "Trading", "Works",
];

/// splitmix64, so every record depends only on its id.
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

impl Record {
    /// The record stored under `id`. Same id, same record.
    pub fn generate(id: u64) -> Self {
        let bits = mix(id);
        let first = FIRST[(bits % FIRST.len() as u64) as usize];
        let second = SECOND[((bits >> 8) % SECOND.len() as u64) as usize];
        let kind = Kind::ALL[((bits >> 16) % Kind::ALL.len() as u64) as usize];
        let magnitude = ((bits >> 24) % 1_000_000) as i64;
        let amount = match kind {
            Kind::Refund | Kind::Fee => -magnitude,
            Kind::Invoice | Kind::Transfer => magnitude,
        };
        Self {
            id,
            name: format!("{first} {second}"),
            kind,
            amount,
            updated: day_after_epoch((bits >> 44) % 2500),
        }
    }

    /// `1234567` cents as `12,345.67`, sign first.
    pub fn amount_text(&self) -> String {
        let sign = if self.amount < 0 { "-" } else { "" };
        let cents = self.amount.unsigned_abs();
        let whole = (cents / 100).to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("{sign}{grouped}.{:02}", cents % 100)
    }

    /// `updated` as `YYYY-MM-DD`.
    pub fn updated_text(&self) -> String {
        self.updated.format("%Y-%m-%d").to_string()
    }
}

/// First day records can be updated on.
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

fn day_after_epoch(days: u64) -> NaiveDate {
    let epoch = epoch();
    epoch.checked_add_days(Days::new(days)).unwrap_or(epoch)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Amount,
    Updated,
}

impl SortKey {
    /// The next key in header order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            SortKey::Id => SortKey::Name,
            SortKey::Name => SortKey::Amount,
            SortKey::Amount => SortKey::Updated,
            SortKey::Updated => SortKey::Id,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Amount => "amount",
            SortKey::Updated => "updated",
        }
    }

    fn compare(self, a: &Record, b: &Record) -> Ordering {
        let primary = match self {
            SortKey::Id => Ordering::Equal,
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Amount => a.amount.cmp(&b.amount),
            SortKey::Updated => a.updated.cmp(&b.updated),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

/// All records in the current sort order.
#[derive(Debug, Clone)]
pub struct Table {
    records: Vec<Record>,
    sort: SortKey,
}

impl Table {
    pub fn generate(rows: usize) -> Self {
        Self {
            records: (0..rows as u64).map(Record::generate).collect(),
            sort: SortKey::Id,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = key;
        self.records.sort_by(|a, b| key.compare(a, b));
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Records `[start, end)`, clamped to the table.
    pub fn slice(&self, start: usize, end: usize) -> &[Record] {
        let end = end.min(self.records.len());
        let start = start.min(end);
        &self.records[start..end]
    }
}

/// A fixed-width column of the table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: u64,
    pub numeric: bool,
    /// The sort key this column shows, if it has one.
    pub key: Option<SortKey>,
}

pub const COLUMNS: [Column; 5] = [
    Column { title: "id", width: 8, numeric: true, key: Some(SortKey::Id) },
    Column { title: "name", width: 22, numeric: false, key: Some(SortKey::Name) },
    Column { title: "kind", width: 10, numeric: false, key: None },
    Column { title: "amount", width: 14, numeric: true, key: Some(SortKey::Amount) },
    Column { title: "updated", width: 12, numeric: false, key: Some(SortKey::Updated) },
];

/// Cell texts of `record`, in [`COLUMNS`] order.
pub fn cells(record: &Record) -> [String; 5] {
    [
        record.id.to_string(),
        record.name.clone(),
        record.kind.to_string(),
        record.amount_text(),
        record.updated_text(),
    ]
}
