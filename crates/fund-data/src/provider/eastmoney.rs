//! Eastmoney 펀드 데이터 Provider.
//!
//! 공모펀드 목록과 분기별 주식 보유 명세를 Eastmoney 공개 엔드포인트에서 수집합니다.
//!
//! ## 데이터 소스
//! - `/js/fundcode_search.js`: 전체 펀드 목록 (`var r = [[코드, 약어, 약칭, 유형, 병음], ...];`)
//! - `/FundArchivesDatas.aspx?type=jjcc`: 펀드별 주식 보유 명세 (HTML 표를 담은 JS 객체)
//!
//! ## 사용 예시
//! ```rust,ignore
//! let source = EastmoneyFundSource::new()?;
//! let funds = source.fetch_fund_list().await?;
//! let holdings = source.fetch_holdings("000001", "").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use fund_core::{FundListing, HoldingRow};
use reqwest::{Client, RequestBuilder};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use super::FundDataSource;
use crate::error::truncate_body;
use crate::{DataError, Result};

const DEFAULT_FUND_BASE_URL: &str = "https://fund.eastmoney.com";
const DEFAULT_F10_BASE_URL: &str = "https://fundf10.eastmoney.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 보유 명세 요청 시 받아올 최대 종목 수
const HOLDINGS_TOPLINE: &str = "200";

/// Eastmoney Provider 설정.
#[derive(Debug, Clone)]
pub struct EastmoneyOptions {
    /// 펀드 목록 엔드포인트 기본 URL
    pub fund_base_url: String,
    /// F10 (보유 명세) 엔드포인트 기본 URL
    pub f10_base_url: String,
    /// 요청 타임아웃 (None이면 제한 없음)
    pub timeout: Option<Duration>,
}

impl Default for EastmoneyOptions {
    fn default() -> Self {
        Self {
            fund_base_url: DEFAULT_FUND_BASE_URL.to_string(),
            f10_base_url: DEFAULT_F10_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Eastmoney 펀드 데이터 Provider.
pub struct EastmoneyFundSource {
    client: Client,
    fund_base_url: String,
    f10_base_url: String,
}

impl EastmoneyFundSource {
    /// 기본 설정으로 생성
    pub fn new() -> Result<Self> {
        Self::with_options(EastmoneyOptions::default())
    }

    /// 커스텀 설정으로 생성
    pub fn with_options(options: EastmoneyOptions) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            fund_base_url: options.fund_base_url.trim_end_matches('/').to_string(),
            f10_base_url: options.f10_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 요청을 보내고 성공 응답의 본문을 반환합니다.
    async fn send_for_text(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DataError::StatusError {
                status: status.as_u16(),
                body: truncate_body(&body, 200),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl FundDataSource for EastmoneyFundSource {
    fn name(&self) -> &str {
        "eastmoney"
    }

    async fn fetch_fund_list(&self) -> Result<Vec<FundListing>> {
        let url = format!("{}/js/fundcode_search.js", self.fund_base_url);
        let body = self.send_for_text(self.client.get(&url)).await?;

        let listings = parse_fund_list_js(&body)?;
        tracing::debug!(count = listings.len(), "Eastmoney 펀드 목록 파싱 완료");
        Ok(listings)
    }

    async fn fetch_holdings(&self, fund_code: &str, period: &str) -> Result<Vec<HoldingRow>> {
        let url = format!("{}/FundArchivesDatas.aspx", self.f10_base_url);
        let request = self
            .client
            .get(&url)
            .query(&[
                ("type", "jjcc"),
                ("code", fund_code),
                ("topline", HOLDINGS_TOPLINE),
                ("year", period),
                ("month", ""),
            ])
            .header("Referer", format!("{}/", self.f10_base_url));

        let body = self.send_for_text(request).await?;
        parse_holdings_response(&body)
    }
}

/// `fundcode_search.js` 본문을 파싱합니다.
///
/// 본문 형식: `var r = [["000001","HXCZHH","华夏成长混合","混合型-偏股","HUAXIACHENGZHANGHUNHE"],...];`
pub fn parse_fund_list_js(body: &str) -> Result<Vec<FundListing>> {
    let start = body
        .find('[')
        .ok_or_else(|| DataError::ParseError("fund list array not found".to_string()))?;
    let end = body
        .rfind(']')
        .filter(|end| *end > start)
        .ok_or_else(|| DataError::ParseError("fund list array is not closed".to_string()))?;

    let rows: Vec<Vec<Value>> = serde_json::from_str(&body[start..=end])?;

    let listings = rows
        .iter()
        .filter_map(|row| {
            let field = |idx: usize| {
                row.get(idx)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string()
            };
            let optional = |idx: usize| Some(field(idx)).filter(|s| !s.is_empty());

            let code = field(0);
            if code.is_empty() {
                return None;
            }

            Some(FundListing {
                code,
                short_name: field(2),
                fund_type: field(3),
                pinyin_abbr: optional(1),
                full_pinyin: optional(4),
            })
        })
        .collect();

    Ok(listings)
}

/// `FundArchivesDatas.aspx` 응답을 파싱합니다.
///
/// 본문 형식: `var apidata={ content:"<div class='box'>...</div>",arryear:[2024,2023],curyear:2024};`
pub fn parse_holdings_response(body: &str) -> Result<Vec<HoldingRow>> {
    let content = extract_content(body)?;
    parse_holdings_html(&content)
}

/// JS 객체에서 `content` 문자열을 꺼냅니다.
fn extract_content(body: &str) -> Result<String> {
    const CONTENT_KEY: &str = "content:\"";

    let start = body
        .find(CONTENT_KEY)
        .ok_or_else(|| DataError::ParseError("apidata content not found".to_string()))?
        + CONTENT_KEY.len();
    let rest = &body[start..];

    let end = rest
        .find("\",arryear")
        .or_else(|| rest.rfind('"'))
        .ok_or_else(|| DataError::ParseError("apidata content is not closed".to_string()))?;

    Ok(rest[..end].replace("\\\"", "\"").replace("\\/", "/"))
}

/// 보유 명세 HTML을 파싱합니다.
///
/// 분기마다 `div.box` 하나가 있고, `h4.t` 제목의 `&nbsp;&nbsp;` 뒤에 기간 라벨이,
/// 표 헤더에 컬럼명이 들어 있습니다. 컬럼은 헤더 이름으로 찾습니다.
pub fn parse_holdings_html(content: &str) -> Result<Vec<HoldingRow>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document = Html::parse_fragment(content);
    let box_selector = selector("div.box")?;
    let title_selector = selector("h4.t")?;
    let table_selector = selector("table")?;
    let header_selector = selector("th")?;
    let row_selector = selector("tbody tr")?;
    let cell_selector = selector("td")?;

    let mut rows = Vec::new();

    for section in document.select(&box_selector) {
        let period = section
            .select(&title_selector)
            .next()
            .and_then(|title| extract_period(&title.text().collect::<String>()));

        let Some(table) = section.select(&table_selector).next() else {
            continue;
        };

        let headers: Vec<String> = table
            .select(&header_selector)
            .map(|th| normalize_header(&element_text(th)))
            .collect();
        let columns = HoldingColumns::locate(&headers);

        let Some(code_idx) = columns.stock_code else {
            tracing::debug!(?period, "股票代码 컬럼 없음, 섹션 건너뜀");
            continue;
        };

        for tr in table.select(&row_selector) {
            let cells: Vec<String> = tr.select(&cell_selector).map(element_text).collect();
            let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).map(String::as_str);

            let stock_code = cell(Some(code_idx)).unwrap_or_default().to_string();
            if stock_code.is_empty() {
                continue;
            }

            rows.push(HoldingRow {
                stock_code,
                stock_name: cell(columns.stock_name).unwrap_or_default().to_string(),
                ratio: cell(columns.ratio).and_then(parse_number),
                shares: cell(columns.shares).and_then(parse_number),
                market_value: cell(columns.market_value).and_then(parse_number),
                period: period.clone(),
            });
        }
    }

    Ok(rows)
}

/// 헤더 이름으로 찾은 컬럼 위치.
#[derive(Debug, Default, PartialEq, Eq)]
struct HoldingColumns {
    stock_code: Option<usize>,
    stock_name: Option<usize>,
    ratio: Option<usize>,
    shares: Option<usize>,
    market_value: Option<usize>,
}

impl HoldingColumns {
    fn locate(headers: &[String]) -> Self {
        Self {
            stock_code: find_column(headers, |h| h == "股票代码"),
            stock_name: find_column(headers, |h| h == "股票名称"),
            ratio: find_column(headers, |h| h.starts_with("占净值比例")),
            shares: find_column(headers, |h| h.starts_with("持股数")),
            market_value: find_column(headers, |h| h.starts_with("持仓市值")),
        }
    }
}

fn find_column(headers: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    headers.iter().position(|h| pred(h.as_str()))
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DataError::ParseError(format!("selector {}: {}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn normalize_header(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 제목에서 기간 라벨을 추출합니다.
///
/// "华夏成长混合\u{a0}\u{a0}2024年4季度股票投资明细\u{a0}\u{a0}来源：..." -> "2024年4季度股票投资明细"
fn extract_period(title: &str) -> Option<String> {
    title
        .split("\u{a0}\u{a0}")
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 수치 셀 파싱
///
/// "9.87%" -> 9.87, "1,234.56" -> 1234.56, "---" -> None
fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '%')
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '-') {
        return None;
    }

    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLDINGS_BODY: &str = concat!(
        "var apidata={ content:\"",
        "<div class='box'><div class='boxitem w790'>",
        "<h4 class='t'><label class='left'><a href='#'>华夏成长混合</a>&nbsp;&nbsp;2024年4季度股票投资明细</label>",
        "<label class='right lab2 xq505'>&nbsp;&nbsp;来源：<a href='#'>天天基金</a>&nbsp;&nbsp;截止至：<font class='px12'>2024-12-31</font></label></h4>",
        "<div class='space0'></div>",
        "<table class='w782 comm tzxq'><thead><tr>",
        "<th>序号</th><th>股票代码</th><th>股票名称</th><th>相关资讯</th>",
        "<th>占净值<br />比例</th><th>持股数<br />（万股）</th><th>持仓市值<br />（万元）</th>",
        "</tr></thead><tbody>",
        "<tr><td>1</td><td><a href='#'>600519</a></td><td class='tol'><a href='#'>贵州茅台</a></td>",
        "<td><a>变动详情</a></td><td class='tor'>9.87%</td><td class='tor'>12.34</td><td class='tor'>18,765.43</td></tr>",
        "<tr><td>2</td><td><a href='#'>00700</a></td><td class='tol'><a href='#'>腾讯控股</a></td>",
        "<td><a>变动详情</a></td><td class='tor'>5.01%</td><td class='tor'>---</td><td class='tor'>9,001.00</td></tr>",
        "</tbody></table></div></div>",
        "<div class='box'><div class='boxitem w790'>",
        "<h4 class='t'><label class='left'><a href='#'>华夏成长混合</a>&nbsp;&nbsp;2024年3季度股票投资明细</label></h4>",
        "<table class='w782 comm tzxq'><thead><tr>",
        "<th>序号</th><th>股票代码</th><th>股票名称</th><th>相关资讯</th><th>占净值比例</th>",
        "</tr></thead><tbody>",
        "<tr><td>1</td><td>600519</td><td>贵州茅台</td><td></td><td>8.50%</td></tr>",
        "</tbody></table></div></div>",
        "\",arryear:[2024,2023],curyear:2024};"
    );

    #[test]
    fn test_parse_fund_list_js() {
        let body = r#"var r = [["000001","HXCZHH","华夏成长混合","混合型-偏股","HUAXIACHENGZHANGHUNHE"],["000003","ZHKZZZQA","中海可转债债券A","债券型-混合债",""],["","X","broken","",""]];"#;

        let listings = parse_fund_list_js(body).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].code, "000001");
        assert_eq!(listings[0].short_name, "华夏成长混合");
        assert_eq!(listings[0].fund_type, "混合型-偏股");
        assert_eq!(listings[0].pinyin_abbr.as_deref(), Some("HXCZHH"));
        assert_eq!(listings[1].full_pinyin, None);
    }

    #[test]
    fn test_parse_fund_list_short_rows() {
        let body = r#"var r = [["000009","ABC","无类型基金"]];"#;

        let listings = parse_fund_list_js(body).unwrap();
        assert_eq!(listings.len(), 1);
        assert!(listings[0].fund_type.is_empty());
    }

    #[test]
    fn test_parse_fund_list_rejects_garbage() {
        assert!(parse_fund_list_js("<html>blocked</html>").is_err());
        assert!(parse_fund_list_js("var r = ]broken[").is_err());
    }

    #[test]
    fn test_parse_holdings_response() {
        let rows = parse_holdings_response(HOLDINGS_BODY).unwrap();
        assert_eq!(rows.len(), 3);

        let first = &rows[0];
        assert_eq!(first.stock_code, "600519");
        assert_eq!(first.stock_name, "贵州茅台");
        assert_eq!(first.ratio, Some(9.87));
        assert_eq!(first.shares, Some(12.34));
        assert_eq!(first.market_value, Some(18765.43));
        assert_eq!(first.period.as_deref(), Some("2024年4季度股票投资明细"));

        assert_eq!(rows[1].stock_code, "00700");
        assert_eq!(rows[1].shares, None);

        let older = &rows[2];
        assert_eq!(older.period.as_deref(), Some("2024年3季度股票投资明细"));
        assert_eq!(older.ratio, Some(8.5));
        assert_eq!(older.shares, None);
        assert_eq!(older.market_value, None);
    }

    #[test]
    fn test_parse_holdings_empty_content() {
        let body = "var apidata={ content:\"\",arryear:[],curyear:0};";
        assert!(parse_holdings_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_holdings_without_apidata() {
        assert!(parse_holdings_response("<html>error</html>").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("9.87%"), Some(9.87));
        assert_eq!(parse_number("1,234.56"), Some(1234.56));
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("---"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn test_extract_period() {
        assert_eq!(
            extract_period("华夏成长混合\u{a0}\u{a0}2024年4季度股票投资明细"),
            Some("2024年4季度股票投资明细".to_string())
        );
        assert_eq!(extract_period("no separator"), None);
    }

    #[tokio::test]
    async fn test_fetch_fund_list_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/js/fundcode_search.js")
            .with_status(200)
            .with_body(r#"var r = [["110011","YFDZXCZHH","易方达中小盘混合","混合型-偏股","YIFANGDA"]];"#)
            .create_async()
            .await;

        let source = EastmoneyFundSource::with_options(EastmoneyOptions {
            fund_base_url: server.url(),
            f10_base_url: server.url(),
            timeout: None,
        })
        .unwrap();

        let listings = source.fetch_fund_list().await.unwrap();
        mock.assert_async().await;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].code, "110011");
    }

    #[tokio::test]
    async fn test_fetch_holdings_sends_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/FundArchivesDatas.aspx")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("type".into(), "jjcc".into()),
                mockito::Matcher::UrlEncoded("code".into(), "000001".into()),
                mockito::Matcher::UrlEncoded("year".into(), "".into()),
            ]))
            .with_status(200)
            .with_body(HOLDINGS_BODY)
            .create_async()
            .await;

        let source = EastmoneyFundSource::with_options(EastmoneyOptions {
            fund_base_url: server.url(),
            f10_base_url: server.url(),
            timeout: None,
        })
        .unwrap();

        let rows = source.fetch_holdings("000001", "").await.unwrap();
        mock.assert_async().await;
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_holdings_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/FundArchivesDatas.aspx")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .with_body("busy")
            .create_async()
            .await;

        let source = EastmoneyFundSource::with_options(EastmoneyOptions {
            fund_base_url: server.url(),
            f10_base_url: server.url(),
            timeout: None,
        })
        .unwrap();

        let fetch = source.holdings("000001", "").await;
        assert!(matches!(
            fetch,
            crate::provider::HoldingsFetch::Error(DataError::StatusError { status: 503, .. })
        ));
    }

    #[tokio::test]
    #[ignore] // 실제 네트워크 테스트는 ignore
    async fn test_fetch_live_holdings() {
        let source = EastmoneyFundSource::new().unwrap();
        let rows = source.fetch_holdings("000001", "").await.unwrap();
        println!("000001 보유종목: {} 건", rows.len());
        assert!(!rows.is_empty());
    }
}
