use crate::infra::{load_stations, print_json, OutputArgs, SourceArgs, WeightArgs};
use clap::{Args, ValueEnum};
use hikkoshi_lens::config::AppConfig;
use hikkoshi_lens::error::AppError;
use hikkoshi_lens::ranking::{
    FactorKind, LineGroup, RankingPipeline, RentDisplay, Station, StrategyRegistry,
    SubsidyCondition, SubsidySettings,
};

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[command(flatten)]
    pub(crate) weights: WeightArgs,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
    /// Only show the best N stations
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct LinesArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[command(flatten)]
    pub(crate) weights: WeightArgs,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
    /// Maximum number of lines to show (defaults to HIKKOSHI_GROUP_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct RentArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[command(flatten)]
    pub(crate) weights: WeightArgs,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
    /// Subsidy deducted from the rent
    #[arg(long)]
    pub(crate) amount: f64,
    /// Which stations qualify for the subsidy
    #[arg(long, value_enum, default_value_t = ConditionArg::None)]
    pub(crate) condition: ConditionArg,
    /// Threshold for the condition: kilometres for distance, stops for stops
    #[arg(long, default_value_t = 0.0)]
    pub(crate) value: f64,
}

impl RentArgs {
    pub(crate) fn settings(&self) -> SubsidySettings {
        SubsidySettings::new(self.amount, self.condition.into(), self.value)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConditionArg {
    /// No station qualifies
    None,
    /// Stations within the given distance
    Distance,
    /// Stations within the given number of stops of their source station
    Stops,
}

impl From<ConditionArg> for SubsidyCondition {
    fn from(value: ConditionArg) -> Self {
        match value {
            ConditionArg::None => SubsidyCondition::None,
            ConditionArg::Distance => SubsidyCondition::Distance,
            ConditionArg::Stops => SubsidyCondition::Stops,
        }
    }
}

pub(crate) fn pipeline(config: &AppConfig, limit: Option<usize>) -> Result<RankingPipeline, AppError> {
    let group_limit = limit.unwrap_or(config.ranking.group_limit);
    Ok(RankingPipeline::new(StrategyRegistry::standard(), group_limit)?)
}

pub(crate) fn run_rank(args: RankArgs, config: &AppConfig) -> Result<(), AppError> {
    let stations = load_stations(&args.source, config)?;
    let mut ranked = pipeline(config, None)?.rank(&stations, &args.weights.raw()?)?;
    if let Some(top) = args.top {
        ranked.truncate(top);
    }

    if args.output.json {
        return print_json(&ranked);
    }
    render_ranking(&ranked);
    Ok(())
}

pub(crate) fn run_lines(args: LinesArgs, config: &AppConfig) -> Result<(), AppError> {
    let stations = load_stations(&args.source, config)?;
    let groups = pipeline(config, args.limit)?.group_by_line(&stations, &args.weights.raw()?)?;

    if args.output.json {
        return print_json(&groups);
    }
    render_groups(&groups);
    Ok(())
}

pub(crate) fn run_rent(args: RentArgs, config: &AppConfig) -> Result<(), AppError> {
    let stations = load_stations(&args.source, config)?;
    let pipeline = pipeline(config, None)?;
    let ranked = pipeline.rank(&stations, &args.weights.raw()?)?;
    let settings = args.settings();
    let displays = pipeline.rent_display(&ranked, &settings);

    if args.output.json {
        return print_json(&displays);
    }
    render_rents(&ranked, &displays, &settings);
    Ok(())
}

pub(crate) fn render_ranking(stations: &[Station]) {
    if stations.is_empty() {
        println!("No stations to rank");
        return;
    }

    for (position, station) in stations.iter().enumerate() {
        println!(
            "{:>3}. {} ({}) score {:.1} | {} | rent {}",
            position + 1,
            station.name,
            line_label(station),
            station.total_score,
            format_distance(station.distance_km),
            format_rent(station.resolved_rent()),
        );
        let details = FactorKind::ordered()
            .into_iter()
            .filter_map(|factor| {
                station
                    .score_details
                    .get(&factor)
                    .map(|score| format!("{factor} {score:.0}"))
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!("     {details}");
        if let (Some(source), Some(stops)) = (&station.source_station, station.stops_from_source) {
            println!("     {stops} stop(s) from {source}");
        }
    }
}

fn render_groups(groups: &[LineGroup]) {
    if groups.is_empty() {
        println!("No lines to show");
        return;
    }

    for (position, group) in groups.iter().enumerate() {
        let best = group
            .top()
            .map(|station| format!("{} {:.1}", station.name, station.total_score))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>2}. {} {} | {} station(s) | best {}",
            position + 1,
            display_or_dash(&group.operator_code),
            display_or_dash(&group.line_name),
            group.members.len(),
            best
        );
        for station in &group.members {
            println!(
                "    - {} score {:.1} | {}",
                station.name,
                station.total_score,
                format_distance(station.distance_km)
            );
        }
    }
}

fn render_rents(stations: &[Station], displays: &[RentDisplay], settings: &SubsidySettings) {
    println!(
        "Subsidy {:.1} ({:?}, threshold {})",
        settings.amount, settings.condition_type, settings.condition_value
    );
    for (station, display) in stations.iter().zip(displays) {
        let effective = display
            .effective_rent
            .amount()
            .map(|rent| format!("{rent:.1}"))
            .unwrap_or_else(|| "unknown".to_string());
        let marker = if display.is_subsidized { " [subsidized]" } else { "" };
        println!(
            "- {}: {} (market {}){}",
            station.name,
            effective,
            format_rent(display.market_rent),
            marker
        );
    }
}

fn line_label(station: &Station) -> String {
    let (operator, line) = station.line_key();
    match (operator.is_empty(), line.is_empty()) {
        (true, true) => "unknown line".to_string(),
        (true, false) => line.to_string(),
        (false, true) => operator.to_string(),
        (false, false) => format!("{operator} {line}"),
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn format_distance(distance_km: Option<f64>) -> String {
    distance_km
        .map(|km| format!("{km:.2} km"))
        .unwrap_or_else(|| "distance unknown".to_string())
}

fn format_rent(rent: Option<f64>) -> String {
    rent.map(|rent| format!("{rent:.1}"))
        .unwrap_or_else(|| "unknown".to_string())
}
