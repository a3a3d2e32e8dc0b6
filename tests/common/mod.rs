#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "姓名,日期,想明白,讲清楚,执行到位,管自己,管业务,管团队,劳模型,好人型,严师型,遥控型,隐身型,黄牛型,军师型,内敛型";

/// One CSV line. Scores follow the header order: capability, focus, types.
pub fn csv_line(name: &str, date: &str, scores: [f64; 14]) -> String {
    let cells: Vec<String> = scores.iter().map(|s| s.to_string()).collect();
    format!("{},{},{}", name, date, cells.join(","))
}

pub fn csv(lines: &[String]) -> String {
    let mut out = String::from(HEADER);
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    out.push('\n');
    out
}

pub fn write_csv(dir: &Path, file_name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, csv(lines)).expect("write fixture");
    path
}

pub fn uniform(value: f64) -> [f64; 14] {
    [value; 14]
}

/// Capability 90/80/70, focus 60/50/40, types ascending so 内敛型 leads.
pub fn sample_scores() -> [f64; 14] {
    [
        90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0,
    ]
}
