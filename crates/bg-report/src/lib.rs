#![deny(warnings)]

//! Presentation helpers for BusinessGraph results.
//!
//! This crate owns everything the engine deliberately leaves out:
//! - localized message catalogs (Kazakh, Russian) and advisory tip text
//! - the text result panel built from a [`ResultBundle`]
//! - CSV and JSON export of the sampled dataset, and export file naming

use bg_econ::{Advisory, Breakeven, ResultBundle};
use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors produced while rendering or exporting results.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown language: {0}")]
    UnknownLang(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Interface language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Kazakh.
    #[default]
    Kk,
    /// Russian.
    Ru,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::Kk, Lang::Ru];

    pub fn code(self) -> &'static str {
        match self {
            Lang::Kk => "kk",
            Lang::Ru => "ru",
        }
    }

    /// Name of the language in that language, for selectors.
    pub fn native_name(self) -> &'static str {
        match self {
            Lang::Kk => "Қазақша",
            Lang::Ru => "Русский",
        }
    }

    /// Selector line in the language itself, e.g. `Язык: Русский`.
    pub fn selector_line(self) -> String {
        format!("{}: {}", self.messages().language, self.native_name())
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Lang::Kk => &KK,
            Lang::Ru => &RU,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kk" => Ok(Lang::Kk),
            "ru" => Ok(Lang::Ru),
            other => Err(ReportError::UnknownLang(other.to_string())),
        }
    }
}

/// Message catalog for one language.
///
/// Templates use `{x0}`, `{tip}` and `{max}` placeholders.
#[derive(Debug)]
pub struct Messages {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub about: &'static str,
    pub language: &'static str,
    pub inputs: &'static str,
    pub price: &'static str,
    pub cost: &'static str,
    pub fixed: &'static str,
    pub qty_max: &'static str,
    pub results: &'static str,
    pub breakeven: &'static str,
    pub no_breakeven: &'static str,
    pub beyond_chart: &'static str,
    pub chart_title: &'static str,
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    pub revenue: &'static str,
    pub costs: &'static str,
    pub profit: &'static str,
    pub ai_header: &'static str,
    pub ai_tip: &'static str,
    pub footer: &'static str,
    tips: [&'static str; 3],
}

impl Messages {
    /// Localized tip text for an advisory category.
    pub fn tip(&self, advisory: Advisory) -> &'static str {
        match advisory {
            Advisory::RaisePrice => self.tips[0],
            Advisory::ReduceCost => self.tips[1],
            Advisory::ScaleVolume => self.tips[2],
        }
    }
}

static KK: Messages = Messages {
    title: "💼 BusinessGraph Pro",
    subtitle: "Кәсіпкерлерге арналған пайда–шығын анализаторы (функция графиктері)",
    about: "Бағдарлама: баға, өзіндік құн, тұрақты шығын арқылы түсім, шығын, пайда функцияларын есептейді, график салады және зиянсыздық нүктесін көрсетеді.",
    language: "Тіл",
    inputs: "📋 Деректер",
    price: "Өнім бағасы (теңге)",
    cost: "Өзіндік құн (теңге)",
    fixed: "Тұрақты шығын (теңге)",
    qty_max: "Максималды өнім саны",
    results: "Нәтиже",
    breakeven: "✅ Зиянсыздық нүктесі: шамамен {x0} дана өнім",
    no_breakeven: "⚠️ Өнім бағасы өзіндік құннан төмен. Пайда болмайды.",
    beyond_chart: "ℹ️ Зиянсыздық нүктесі графиктен тыс жатыр (x ≤ {max}).",
    chart_title: "Функция графигін кәсіпорын экономикасында қолдану",
    x_axis: "Өнім саны (x)",
    y_axis: "Теңге",
    revenue: "Түсім (T(x))",
    costs: "Шығын (S(x))",
    profit: "Пайда (P(x))",
    ai_header: "🤖 ЖИ талдауы",
    ai_tip: "💡 Кеңес: {tip}",
    footer: "© 2025 Ералиева-Абильдаева",
    tips: [
        "Бағаны 5–10% көтеру зиянсыздық нүктесін жақындатады, бірақ сұраныстың өзгерісін ескеріңіз.",
        "Егер өзіндік құнды 5% азайтсаңыз, табыстылық айтарлықтай өседі.",
        "Тұрақты шығын көп болса, сату көлемін көбейту қажет — жарнама немесе акция ойластырыңыз.",
    ],
};

static RU: Messages = Messages {
    title: "💼 BusinessGraph Pro",
    subtitle: "Анализатор прибыли и издержек для предпринимателей (графики функций)",
    about: "Приложение рассчитывает функции выручки, издержек и прибыли по цене, себестоимости и постоянным расходам, строит график и показывает точку безубыточности.",
    language: "Язык",
    inputs: "📋 Данные",
    price: "Цена продукта (тенге)",
    cost: "Себестоимость (тенге)",
    fixed: "Постоянные расходы (тенге)",
    qty_max: "Максимальное количество продукции",
    results: "Результаты",
    breakeven: "✅ Точка безубыточности: около {x0} единиц продукции",
    no_breakeven: "⚠️ Цена ниже себестоимости. Прибыли не будет.",
    beyond_chart: "ℹ️ Точка безубыточности лежит за пределами графика (x ≤ {max}).",
    chart_title: "Применение графика функции в экономике предприятия",
    x_axis: "Количество продукции (x)",
    y_axis: "Тенге",
    revenue: "Выручка (T(x))",
    costs: "Издержки (S(x))",
    profit: "Прибыль (P(x))",
    ai_header: "🤖 AI-анализ",
    ai_tip: "💡 Совет: {tip}",
    footer: "© 2025 Ералиева-Абильдаева",
    tips: [
        "Повышение цены на 5–10% приблизит точку безубыточности, но учитывайте спрос.",
        "Если снизить себестоимость на 5%, рентабельность заметно вырастет.",
        "При высоких постоянных расходах увеличьте объем продаж — подумайте о рекламе или акциях.",
    ],
};

/// Round to two decimal places for display.
///
/// Rounds the exact binary value of `value`, half-to-even, so `2.675`
/// (stored as 2.67499...) shows as `2.67`.
///
/// Example:
/// assert_eq!(format_quantity(500.0), "500.00");
pub fn format_quantity(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(d) => format!(
            "{:.2}",
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        ),
        None => format!("{value:.2}"),
    }
}

/// How a result line should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Info,
}

/// One rendered message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

/// Number of grid rows shown in the text summary table.
pub const SUMMARY_ROWS: usize = 5;

/// Localized result panel for one [`ResultBundle`].
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub lang: Lang,
    pub heading: String,
    pub breakeven: Line,
    pub range_note: Option<Line>,
    pub advisory_header: String,
    pub tip: Line,
    pub table: Vec<[String; 4]>,
}

impl Report {
    pub fn new(bundle: &ResultBundle, lang: Lang) -> Self {
        let m = lang.messages();
        let breakeven = match bundle.breakeven() {
            Breakeven::Point { x0 } => Line {
                tone: Tone::Success,
                text: m.breakeven.replace("{x0}", &format_quantity(x0)),
            },
            Breakeven::Infeasible => Line {
                tone: Tone::Warning,
                text: m.no_breakeven.to_string(),
            },
        };
        let range_note = match bundle.breakeven_in_range() {
            Some(false) => Some(Line {
                tone: Tone::Info,
                text: m
                    .beyond_chart
                    .replace("{max}", &format_quantity(bundle.params().max_quantity())),
            }),
            _ => None,
        };
        let tip = Line {
            tone: Tone::Info,
            text: m.ai_tip.replace("{tip}", m.tip(bundle.advisory())),
        };
        Self {
            lang,
            heading: m.results.to_string(),
            breakeven,
            range_note,
            advisory_header: m.ai_header.to_string(),
            tip,
            table: summary_table(bundle, m),
        }
    }

    /// Plain-text rendering for terminals.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("## {}\n", self.heading));
        for row in &self.table {
            out.push_str(&format!(
                "{:>28} | {:>18} | {:>18} | {:>18}\n",
                row[0], row[1], row[2], row[3]
            ));
        }
        out.push_str(&self.breakeven.text);
        out.push('\n');
        if let Some(note) = &self.range_note {
            out.push_str(&note.text);
            out.push('\n');
        }
        out.push_str(&format!("### {}\n", self.advisory_header));
        out.push_str(&self.tip.text);
        out.push('\n');
        out
    }
}

/// Header row plus [`SUMMARY_ROWS`] evenly spread grid rows.
fn summary_table(bundle: &ResultBundle, m: &Messages) -> Vec<[String; 4]> {
    let mut table = vec![[
        m.x_axis.to_string(),
        m.revenue.to_string(),
        m.costs.to_string(),
        m.profit.to_string(),
    ]];
    let rows: Vec<_> = bundle.rows().collect();
    if rows.is_empty() {
        return table;
    }
    let last = rows.len() - 1;
    for k in 0..SUMMARY_ROWS {
        let r = rows[k * last / (SUMMARY_ROWS - 1)];
        table.push([
            format_quantity(r.x),
            format_quantity(r.revenue),
            format_quantity(r.costs),
            format_quantity(r.profit),
        ]);
    }
    table
}

/// File name used for the CSV export.
pub const CSV_FILE_NAME: &str = "businessgraph_data.csv";

/// `{prefix}_YYYYmmdd_HHMMSS.{ext}`
pub fn timestamped_file_name(prefix: &str, ext: &str, at: NaiveDateTime) -> String {
    format!("{}_{}.{}", prefix, at.format("%Y%m%d_%H%M%S"), ext)
}

/// Float text matching the usual `repr` form: `0.0`, `2.5`, `1e+16`, `1.5e-07`.
fn fmt_float(v: f64) -> String {
    let s = format!("{v:?}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// Write the dataset as CSV with header `x,revenue,costs,profit`.
pub fn write_csv<W: Write>(bundle: &ResultBundle, mut w: W) -> Result<(), ReportError> {
    writeln!(w, "x,revenue,costs,profit")?;
    for r in bundle.rows() {
        writeln!(
            w,
            "{},{},{},{}",
            fmt_float(r.x),
            fmt_float(r.revenue),
            fmt_float(r.costs),
            fmt_float(r.profit)
        )?;
    }
    w.flush()?;
    Ok(())
}

/// CSV export as UTF-8 bytes.
pub fn csv_bytes(bundle: &ResultBundle) -> Result<Vec<u8>, ReportError> {
    let mut buf = Vec::new();
    write_csv(bundle, &mut buf)?;
    Ok(buf)
}

/// Write the full bundle as pretty JSON.
pub fn write_json<W: Write>(bundle: &ResultBundle, mut w: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut w, bundle)?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

pub fn export_csv(bundle: &ResultBundle, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_csv(bundle, BufWriter::new(file))?;
    info!(path = %path.display(), rows = bundle.grid().len(), "wrote csv export");
    Ok(())
}

pub fn export_json(bundle: &ResultBundle, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_json(bundle, BufWriter::new(file))?;
    info!(path = %path.display(), "wrote json snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bg_econ::{analyze, SAMPLE_COUNT};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    #[test]
    fn lang_parsing() {
        assert_eq!("kk".parse::<Lang>().unwrap(), Lang::Kk);
        assert_eq!(" RU ".parse::<Lang>().unwrap(), Lang::Ru);
        assert!(matches!(
            "en".parse::<Lang>(),
            Err(ReportError::UnknownLang(s)) if s == "en"
        ));
        assert_eq!(Lang::default(), Lang::Kk);
        assert_eq!(Lang::Ru.native_name(), "Русский");
        assert_eq!(Lang::Ru.selector_line(), "Язык: Русский");
        assert_eq!(Lang::Kk.selector_line(), "Тіл: Қазақша");
    }

    #[test]
    fn every_advisory_has_distinct_text() {
        for lang in Lang::ALL {
            let m = lang.messages();
            let a = m.tip(Advisory::RaisePrice);
            let b = m.tip(Advisory::ReduceCost);
            let c = m.tip(Advisory::ScaleVolume);
            assert!(a != b && b != c && a != c);
        }
        assert!(Lang::Ru.messages().tip(Advisory::ReduceCost).contains("себестоимость"));
    }

    #[test]
    fn quantity_has_two_decimals() {
        assert_eq!(format_quantity(500.0), "500.00");
        assert_eq!(format_quantity(1000.0 / 3.0), "333.33");
        assert_eq!(format_quantity(0.0), "0.00");
    }

    #[test]
    fn quantity_rounds_stored_binary_value() {
        assert_eq!(format_quantity(2.675), "2.67");
        assert_eq!(format_quantity(0.125), "0.12");
        assert_eq!(format_quantity(0.375), "0.38");
        assert_eq!(format_quantity(1.005), "1.00");
    }

    #[test]
    fn breakeven_line_uses_stored_value() {
        let bundle = analyze(2.0, 1.0, 2.675, 100.0).unwrap();
        let report = Report::new(&bundle, Lang::Ru);
        assert_eq!(
            report.breakeven.text,
            "✅ Точка безубыточности: около 2.67 единиц продукции"
        );
    }

    #[test]
    fn report_for_feasible_scenario() {
        let bundle = analyze(2000.0, 1200.0, 400_000.0, 1000.0).unwrap();
        let report = Report::new(&bundle, Lang::Ru);
        assert_eq!(report.breakeven.tone, Tone::Success);
        assert_eq!(
            report.breakeven.text,
            "✅ Точка безубыточности: около 500.00 единиц продукции"
        );
        assert!(report.range_note.is_none());
        assert!(report.tip.text.starts_with("💡 Совет: При высоких"));
        assert_eq!(report.table.len(), SUMMARY_ROWS + 1);
        assert_eq!(report.table[1][0], "0.00");
        assert_eq!(report.table[SUMMARY_ROWS][0], "1000.00");
        let text = report.render();
        assert!(text.contains("## Результаты"));
        assert!(text.contains("### 🤖 AI-анализ"));
    }

    #[test]
    fn report_for_infeasible_scenario() {
        let bundle = analyze(1000.0, 1200.0, 50_000.0, 500.0).unwrap();
        let report = Report::new(&bundle, Lang::Kk);
        assert_eq!(report.breakeven.tone, Tone::Warning);
        assert_eq!(report.breakeven.text, KK.no_breakeven);
        assert!(report.tip.text.ends_with(KK.tip(Advisory::ReduceCost)));
    }

    #[test]
    fn report_notes_breakeven_beyond_chart() {
        let bundle = analyze(2000.0, 1200.0, 4_000_000.0, 1000.0).unwrap();
        let report = Report::new(&bundle, Lang::Ru);
        let note = report.range_note.unwrap();
        assert_eq!(note.tone, Tone::Info);
        assert!(note.text.contains("1000.00"));
    }

    #[test]
    fn csv_layout() {
        let bundle = analyze(2000.0, 1200.0, 400_000.0, 1000.0).unwrap();
        let text = String::from_utf8(csv_bytes(&bundle).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), SAMPLE_COUNT + 1);
        assert_eq!(lines[0], "x,revenue,costs,profit");
        assert_eq!(lines[1], "0.0,0.0,400000.0,-400000.0");
        assert_eq!(lines[SAMPLE_COUNT], "1000.0,2000000.0,1600000.0,400000.0");
    }

    #[test]
    fn float_text() {
        assert_eq!(fmt_float(0.0), "0.0");
        assert_eq!(fmt_float(2.5), "2.5");
        assert_eq!(fmt_float(1e16), "1e+16");
        assert_eq!(fmt_float(1.5e-7), "1.5e-07");
    }

    #[test]
    fn json_snapshot_has_advisory_key() {
        let bundle = analyze(1000.0, 900.0, 100_000.0, 2000.0).unwrap();
        let mut buf = Vec::new();
        write_json(&bundle, &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["advisory"], "raise_price");
    }

    #[test]
    fn file_names() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        assert_eq!(
            timestamped_file_name("businessgraph", "json", at),
            "businessgraph_20250307_090501.json"
        );
        assert_eq!(CSV_FILE_NAME, "businessgraph_data.csv");
    }

    proptest! {
        #[test]
        fn csv_always_has_fixed_rows(price in 0.0f64..1e5,
                                     cost in 0.0f64..1e5,
                                     fixed in 0.0f64..1e9,
                                     steps in 1u32..=100) {
            let bundle = analyze(price, cost, fixed, steps as f64 * 100.0).unwrap();
            let text = String::from_utf8(csv_bytes(&bundle).unwrap()).unwrap();
            prop_assert_eq!(text.lines().count(), SAMPLE_COUNT + 1);
            prop_assert!(text.lines().skip(1).all(|l| l.split(',').count() == 4));
        }
    }
}
