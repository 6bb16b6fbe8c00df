//! 结果输出（表格或 JSON）

use anyhow::Result;
use serde::Serialize;
use tabled::{Table, settings::Style};

use common::{ChannelRecord, ProgramEntry};
use processor_schedule::{ShowState, Timeline};

#[derive(Debug, Serialize)]
struct ScheduleRow<'a> {
    time: &'a str,
    name: &'a str,
    hour: u8,
    minute: u8,
    state: Option<ShowState>,
}

#[derive(Debug, Serialize)]
struct WatchInfo<'a> {
    channel: &'a ChannelRecord,
    video_url: &'a str,
    schedule: Option<Vec<ScheduleRow<'a>>>,
}

fn table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let header = header.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    let mut table = Table::from_iter(std::iter::once(header).chain(rows));
    table.with(Style::modern());
    table.to_string()
}

fn schedule_rows<'a>(programs: &'a [ProgramEntry], timeline: Option<&Timeline>) -> Vec<ScheduleRow<'a>> {
    programs
        .iter()
        .enumerate()
        .map(|(i, program)| ScheduleRow {
            time: program.time_text(),
            name: program.name(),
            hour: program.hour(),
            minute: program.minute(),
            state: timeline.and_then(|t| t.states.get(i).copied()),
        })
        .collect()
}

pub fn render_channels(channels: &[ChannelRecord], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(channels)?);
    }

    if channels.is_empty() {
        return Ok("No channels found.".to_string());
    }

    let rows = channels
        .iter()
        .map(|c| vec![c.name.clone(), c.page_address.clone(), c.icon_address.clone()])
        .collect();
    Ok(table(&["Channel", "Page", "Icon"], rows))
}

pub fn render_schedule(programs: &[ProgramEntry], timeline: &Timeline, json: bool) -> Result<String> {
    let rows = schedule_rows(programs, Some(timeline));

    if json {
        return Ok(serde_json::to_string_pretty(&rows)?);
    }

    Ok(schedule_table(&rows))
}

fn schedule_table(rows: &[ScheduleRow<'_>]) -> String {
    if rows.is_empty() {
        return "No programs found.".to_string();
    }

    let rows = rows
        .iter()
        .map(|row| {
            vec![
                row.time.to_string(),
                row.name.to_string(),
                row.state.map(|s| s.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    table(&["Time", "Program", ""], rows)
}

pub fn render_video(url: &str, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&serde_json::json!({ "video_url": url }))?);
    }

    Ok(url.to_string())
}

pub fn render_watch(
    channel: &ChannelRecord,
    video_url: &str,
    programs: Option<&[ProgramEntry]>,
    timeline: Option<&Timeline>,
    json: bool,
) -> Result<String> {
    let schedule = programs.map(|p| schedule_rows(p, timeline));

    if json {
        let info = WatchInfo {
            channel,
            video_url,
            schedule,
        };
        return Ok(serde_json::to_string_pretty(&info)?);
    }

    let schedule_text = match &schedule {
        Some(rows) => schedule_table(rows),
        None => "Schedule unavailable.".to_string(),
    };

    Ok(format!(
        "{}\n{}\n\n{}",
        channel.name, video_url, schedule_text
    ))
}
