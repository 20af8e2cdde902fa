use std::{
    cmp::Reverse,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{entry::Entry, error_time, Result, REPORT_FILE_PREFIX};

const HIGHLIGHT_PERCENT: i32 = 88;
const HIGHLIGHT_BGCOLOR: &str = "#FFC5D0";
const RED: &str = "#ee2323";
const ORANGE: &str = "#f89009";
const GREEN: &str = "#409d00";

const THUMB_WIDTH: u32 = 215;
const THUMB_HEIGHT: u32 = 120;

pub const REPORT_CLOSING: &str = "</tbody>\n</table>\n</body>\n</html>";

/// `{output_dir}/kor_YYYYMMDD.html`
pub fn report_path(output_dir: &Path, date: NaiveDate) -> PathBuf {
    output_dir.join(format!(
        "{REPORT_FILE_PREFIX}{}.html",
        date.format("%Y%m%d")
    ))
}

#[inline]
pub fn is_reportable(entry: &Entry, min_discount_percent: i32) -> bool {
    entry.supports_korean && entry.discount_percent >= min_discount_percent
}

/// Cheapest first; for the same price the bigger discount goes first.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by_key(|e| (e.result_price, Reverse(e.discount_percent)));
}

/// The entries that make it into the report, in report order.
pub fn select_entries(mut entries: Vec<Entry>, min_discount_percent: i32) -> Vec<Entry> {
    sort_entries(&mut entries);
    entries.retain(|e| is_reportable(e, min_discount_percent));
    entries
}

/// Document start, the guide line and the table header row.
pub fn report_preamble(min_discount_percent: i32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <title>닌텐도 스위치 할인 정보</title>
</head>
<body>
<p>{min_discount_percent}% 이상 할인이 적용된 게임만 선정하였습니다.</p>
<table style="border-collapse: collapse; width: 100%;" border="1" data-ke-align="alignLeft">
<tbody>
<tr>
<td style="width: 20%;">게임명</td>
<td style="width: 20%;">게임정보</td>
<td style="width: 20%;">할인기간</td>
<td style="width: 15%;">할인가격</td>
<td style="width: 10%;">한국어지원여부</td>
</tr>
"#
    )
}

/// One `<tr>` of the report.
pub fn render_row(entry: &Entry) -> String {
    let mut row = String::from("<tr>\n");

    row.push_str(&format!(
        r#"<td style="width: 20%;"><p><a href="{}" target="_blank" rel="noopener">{}</a></p>"#,
        encode_double_quoted_attribute(&entry.detail_url),
        encode_text(&entry.title)
    ));
    if !entry.image.is_empty() {
        row.push_str(&format!(
            r#"<img src="{}" width="{THUMB_WIDTH}" height="{THUMB_HEIGHT}" alt="gameScreenShot" style = "max-width: 100%">"#,
            encode_double_quoted_attribute(&entry.image)
        ));
    }
    row.push_str("</td>\n");

    row.push_str("<td>");
    if let Some(genre) = &entry.genre {
        row.push_str(&format!(
            "<br />\n{}<br />\n{}<br />\n{}",
            encode_text(&entry.released),
            encode_text(genre),
            encode_text(entry.players.as_deref().unwrap_or_default())
        ));
    }
    row.push_str("</td>\n");

    row.push_str(&format!(
        "<td style=\"width: 20%;\">{}</td>\n",
        encode_text(entry.sale_period.as_deref().unwrap_or_default())
    ));

    if entry.discount_percent >= HIGHLIGHT_PERCENT {
        row.push_str(&format!(
            r#"<td style="width: 15%;" bgcolor="{HIGHLIGHT_BGCOLOR}">"#
        ));
    } else {
        row.push_str(r#"<td style="width: 15%;">"#);
    }
    row.push_str(&format!(
        "<b><del>{}원</del><br />\n{}원</b>({}%)</td>\n",
        fmt_won(entry.price),
        fmt_won(entry.discount_price),
        color_percent(entry.discount_percent)
    ));

    row.push_str(&format!(
        "<td style=\"width: 10%;\">{}</td>\n",
        if entry.supports_korean { "O" } else { "X" }
    ));

    row.push_str("</tr>\n");
    row
}

/// Red from 75%, orange from 25%, green below.
fn color_percent(percent: i32) -> String {
    let color = match percent {
        p if p >= 75 => RED,
        p if p >= 25 => ORANGE,
        _ => GREEN,
    };
    format!(r#"<span style="color: {color};">{percent}</span>"#)
}

/// `1234567` -> `1,234,567`
fn fmt_won(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Filters and sorts `entries` and writes them out as an HTML table at `path`.
///
/// The file is truncated by the first write and appended to after that,
/// reopening it every time. A row that fails to write is logged and skipped.
/// Returns the number of rows written.
pub async fn write_report(
    entries: Vec<Entry>,
    path: &Path,
    min_discount_percent: i32,
) -> Result<usize> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }

    save_html(path, &report_preamble(min_discount_percent), false).await?;

    let mut written = 0;
    for entry in select_entries(entries, min_discount_percent) {
        match save_html(path, &render_row(&entry), true).await {
            Ok(()) => written += 1,
            Err(e) => error_time!("Couldn't write the row of {}: {}", entry.title, e),
        }
    }

    save_html(path, REPORT_CLOSING, true).await?;
    Ok(written)
}

async fn save_html(path: &Path, content: &str, append: bool) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}
