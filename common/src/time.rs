//! 节目时间解析
//!
//! 只接受 `HH:MM` 形式的 5 个字符，不做取值范围检查（`99:99` 也会被接受）。

use crate::error::{ScrapeError, ScrapeResult};

/// 时间文本的固定长度
pub const TIME_TEXT_LEN: usize = 5;

/// 解析 `HH:MM`，返回 `(hour, minute)`
pub fn parse_time(text: &str) -> ScrapeResult<(u8, u8)> {
    let chars: Vec<char> = text.chars().collect();

    if chars.len() != TIME_TEXT_LEN {
        return Err(ScrapeError::format(format!(
            "time {:?} must be exactly {} characters",
            text, TIME_TEXT_LEN
        )));
    }

    if chars[2] != ':' {
        return Err(ScrapeError::format(format!(
            "time {:?} has no ':' separator at index 2",
            text
        )));
    }

    let digit = |c: char| {
        // to_digit 只识别 ASCII 数字
        c.to_digit(10)
            .map(|d| d as u8)
            .ok_or_else(|| ScrapeError::format(format!("time {:?} contains non-digit {:?}", text, c)))
    };

    let hour = digit(chars[0])? * 10 + digit(chars[1])?;
    let minute = digit(chars[3])? * 10 + digit(chars[4])?;

    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_times() {
        let cases = vec![
            ("00:00", (0, 0)),
            ("07:05", (7, 5)),
            ("12:30", (12, 30)),
            ("23:59", (23, 59)),
        ];

        for (text, expected) in cases {
            assert_eq!(parse_time(text).unwrap(), expected, "parsing {}", text);
        }
    }

    #[test]
    fn test_parse_out_of_range_is_accepted() {
        // 不做范围校验
        assert_eq!(parse_time("25:99").unwrap(), (25, 99));
        assert_eq!(parse_time("99:99").unwrap(), (99, 99));
        assert_eq!(parse_time("24:60").unwrap(), (24, 60));
    }

    #[test]
    fn test_parse_invalid_shapes() {
        let cases = vec![
            "",
            "1:30",
            "01:3",
            "001:30",
            "12:300",
            "12-30",
            "1230 ",
            "ab:cd",
            "1a:30",
            "12:3b",
            " 2:30",
            "12::0",
            ":1230",
            "12:30\n",
            "１２:３０",
            "١٢:٣٠",
        ];

        for text in cases {
            assert!(
                matches!(parse_time(text), Err(ScrapeError::Format(_))),
                "{:?} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_parse_all_digit_pairs() {
        for hour in 0..100u8 {
            for minute in [0u8, 9, 10, 59, 60, 99] {
                let text = format!("{:02}:{:02}", hour, minute);
                assert_eq!(parse_time(&text).unwrap(), (hour, minute));
            }
        }
    }
}
