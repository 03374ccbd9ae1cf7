use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::StatsAggregator;
use crate::errors::AppResult;
use crate::models::report::{MetricStat, PeriodStat};
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_change};
use chrono::Local;

fn change(m: &MetricStat) -> String {
    format!("{}{:+.2}%{}", color_for_change(m.change), m.change, RESET)
}

fn print_periods(title: &str, stats: &[PeriodStat], date_fmt: &str) {
    println!("\n{}:", title);
    for p in stats {
        println!(
            "  {:<10}  {:>6.2} hrs  {:>3} sessions",
            p.start.format(date_fmt).to_string(),
            p.hours,
            p.sessions
        );
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary { breakdown } = cmd {
        let pool = open_pool(cfg)?;
        let now = Local::now();

        let stats = StatsAggregator::summary(&pool, now)?;

        println!("📊 Summary Stats:");
        println!("• Today's Hours: {:.2} hrs ({})", stats.today_hours.value, change(&stats.today_hours));
        println!("• Week Hours: {:.2} hrs ({})", stats.week_hours.value, change(&stats.week_hours));
        println!("• Sessions Today: {:.0} ({})", stats.sessions_today.value, change(&stats.sessions_today));
        println!(
            "• Productivity Score: {:.2}% ({})",
            stats.productivity_score.value,
            change(&stats.productivity_score)
        );

        if *breakdown {
            let b = StatsAggregator::breakdown(&pool, now)?;
            println!();
            header("Breakdown");
            print_periods("Daily", &b.daily, "%Y-%m-%d");
            print_periods("Weekly (from Monday)", &b.weekly, "%Y-%m-%d");
            print_periods("Monthly", &b.monthly, "%Y-%m");
        }
    }
    Ok(())
}
