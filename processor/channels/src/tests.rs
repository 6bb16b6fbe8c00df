#[cfg(test)]
mod channel_tests {
    use crate::*;
    use common::{Document, Extractor, Fetcher, HttpFetcher, ScrapeError};
    use scraper_engine::ScraperEngine;
    use std::sync::Arc;

    fn extract(html: &str) -> ScrapeResult<Vec<ChannelRecord>> {
        ChannelListExtractor::default().extract(&Document::new(BASE_URL, html))
    }

    #[test]
    fn test_parse_channel_list() {
        let html = r#"
            <html>
                <body>
                    <div class="header">menu</div>
                    <div class="all_tv">
                        <div class="channel">ТЕТ<a href="/447-tet_11.html"><img src="/posts/2022-08/1659824773_tet.png"></a></div>
                        <div class="channel">1+1 <a href="/12-1plus1.html"><img src="/posts/1plus1.png"></a></div>
                    </div>
                </body>
            </html>
        "#;

        let channels = extract(html).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(
            channels[0],
            ChannelRecord::new(
                "ТЕТ",
                "http://ip.viks.tv/447-tet_11.html",
                "http://ip.viks.tv/posts/2022-08/1659824773_tet.png",
            )
        );
        assert_eq!(channels[1].name, "1+1");
        assert_eq!(channels[1].page_address, "http://ip.viks.tv/12-1plus1.html");
        assert_eq!(channels[1].icon_address, "http://ip.viks.tv/posts/1plus1.png");
    }

    #[test]
    fn test_skips_entry_without_icon() {
        let html = r#"
            <div class="all_tv">
                <div>First<a href="/1.html"><img src="/1.png"></a></div>
                <div>Second<a href="/2.html"></a></div>
                <div>Third<a href="/3.html"><img src="/3.png"></a></div>
            </div>
        "#;

        let channels = extract(html).unwrap();
        let names: Vec<&str> = channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Third"]);
    }

    #[test]
    fn test_skips_entries_with_missing_attributes() {
        let html = r#"
            <div class="all_tv">
                <div>No link<img src="/a.png"></div>
                <div>No href<a name="x"><img src="/b.png"></a></div>
                <div>No src<a href="/c.html"><img alt="c"></a></div>
                <div>Good<a href="/d.html"><img src="/d.png"></a></div>
            </div>
        "#;

        let channels = extract(html).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "Good");
    }

    #[test]
    fn test_only_first_link_is_considered() {
        // 第一个链接没有 href 时跳过，不会去找第二个
        let html = r#"
            <div class="all_tv">
                <div>Chan<a><img src="/x.png"></a><a href="/later.html"></a></div>
            </div>
        "#;

        assert!(extract(html).unwrap().is_empty());
    }

    #[test]
    fn test_empty_container_is_success() {
        let html = r#"<div class="all_tv">
            <div>Broken<a href="/b.html"></a></div>
        </div>"#;
        assert_eq!(extract(html).unwrap(), Vec::new());

        let html = r#"<div class="all_tv"></div>"#;
        assert!(extract(html).unwrap().is_empty());
    }

    #[test]
    fn test_only_first_container_is_read() {
        let html = r#"
            <div class="all_tv">
                <div>First<a href="/1.html"><img src="/1.png"></a></div>
            </div>
            <div class="all_tv">
                <div>Second<a href="/2.html"><img src="/2.png"></a></div>
            </div>
        "#;

        let channels = extract(html).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "First");
    }

    #[test]
    fn test_missing_container_is_structural_error() {
        let html = r#"<div class="channels"><div>X<a href="/x"><img src="/x.png"></a></div></div>"#;
        assert!(matches!(extract(html), Err(ScrapeError::Structural(_))));
    }

    #[test]
    fn test_custom_base_url() {
        let extractor = ChannelListExtractor::new("http://mirror.example");
        assert_eq!(extractor.index_url(), "http://mirror.example");

        let html = r#"<div class="all_tv"><div>M<a href="/m.html"><img src="/m.png"></a></div></div>"#;
        let channels = extractor
            .extract(&Document::new("http://mirror.example", html))
            .unwrap();
        assert_eq!(channels[0].page_address, "http://mirror.example/m.html");
    }

    #[test]
    fn test_own_text_excludes_nested_markup() {
        let html = scraper::Html::parse_fragment(
            r#"<div id="c">  Канал   <span>ignored</span> Один </div>"#,
        );
        let element = html.select(&common::selector("#c")).next().unwrap();
        assert_eq!(own_text(element), "Канал Один");
    }

    #[test]
    fn test_find_by_name() {
        let channels = vec![
            ChannelRecord::new("ТЕТ", "p1", "i1"),
            ChannelRecord::new("Discovery", "p2", "i2"),
        ];
        assert_eq!(find_by_name(&channels, "discovery").unwrap().page_address, "p2");
        assert_eq!(find_by_name(&channels, " тет ").unwrap().page_address, "p1");
        assert!(find_by_name(&channels, "missing").is_none());
    }

    #[tokio::test]
    #[ignore = "requires network"]
    async fn test_live_channel_list() {
        dotenv::dotenv().ok();
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new().unwrap());
        let extractor = ChannelListExtractor::default();
        let engine = ScraperEngine::new(extractor.index_url().to_string(), extractor, fetcher);

        let channels = engine.load().await.unwrap();
        for channel in channels.iter() {
            println!("{} | {} | {}", channel.name, channel.page_address, channel.icon_address);
        }
        assert!(!channels.is_empty());
    }
}
