#[cfg(test)]
mod result_page_parsing {
    use rentmap::{
        immoscout::{helpers::parse_address, parser::parse_result_page},
        models::listing::Address,
    };

    const PAGE_1: &str = include_str!("fixtures/result_page_1.html");
    const PAGE_2: &str = include_str!("fixtures/result_page_2.html");

    #[test]
    fn extracts_complete_listings() {
        let page = parse_result_page(PAGE_1).unwrap();
        let ids: Vec<&str> = page.listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["81234567", "81234568", "81234569"]);

        let first = &page.listings[0];
        assert_eq!(first.street.as_deref(), Some("Kaiserallee"));
        assert_eq!(first.number.as_deref(), Some("12"));
        assert_eq!(first.suburb, "Weststadt");
        assert_eq!(first.rent, 750.0);
        assert_eq!(first.area, 60.5);
    }

    #[test]
    fn normalizes_street_and_thousands() {
        let page = parse_result_page(PAGE_1).unwrap();
        let second = &page.listings[1];
        assert_eq!(second.street.as_deref(), Some("Kriegsstraße"));
        assert_eq!(second.number.as_deref(), Some("101"));
        assert_eq!(second.rent, 1150.0);
        assert_eq!(second.area, 92.25);
    }

    #[test]
    fn suburb_only_address() {
        let page = parse_result_page(PAGE_1).unwrap();
        let third = &page.listings[2];
        assert_eq!(third.street, None);
        assert_eq!(third.number, None);
        assert_eq!(third.suburb, "Durlach");
    }

    #[test]
    fn reads_page_count() {
        assert_eq!(parse_result_page(PAGE_1).unwrap().number_of_pages, Some(2));
        assert_eq!(parse_result_page(PAGE_2).unwrap().number_of_pages, Some(2));
    }

    #[test]
    fn trailing_slash_in_expose_link() {
        let page = parse_result_page(PAGE_2).unwrap();
        let waldstr = page.listings.iter().find(|l| l.id == "81234572").unwrap();
        assert_eq!(waldstr.street.as_deref(), Some("Waldstraße"));
        assert_eq!(waldstr.rent, 1020.5);
    }

    #[test]
    fn page_without_results() {
        let page = parse_result_page("<html><body><p>Keine Treffer</p></body></html>").unwrap();
        assert!(page.listings.is_empty());
        assert_eq!(page.number_of_pages, None);
    }

    #[test]
    fn unparsable_numbers_skip_the_listing() {
        let html = r#"
            <div class="resultlist_entry_data">
              <a href="/expose/1">x</a>
              <span class="street">Durlach, Karlsruhe</span>
              <dd class="value">ab 5.00,0,0 €</dd>
              <dd class="value">40 m²</dd>
            </div>"#;
        assert!(parse_result_page(html).unwrap().listings.is_empty());
    }

    #[test]
    fn non_finite_rent_skips_the_listing() {
        let html = r#"
            <div class="resultlist_entry_data">
              <a href="/expose/1">x</a>
              <span class="street">Kaiserallee 1, Weststadt, Karlsruhe</span>
              <dd class="value">NaN €</dd>
              <dd class="value">40 m²</dd>
            </div>
            <div class="resultlist_entry_data">
              <a href="/expose/2">y</a>
              <span class="street">Kaiserallee 2, Weststadt, Karlsruhe</span>
              <dd class="value">500 €</dd>
              <dd class="value">inf m²</dd>
            </div>"#;
        assert!(parse_result_page(html).unwrap().listings.is_empty());
    }

    #[test]
    fn address_forms() {
        assert_eq!(parse_address(" , "), None);
        assert_eq!(
            parse_address("Durlach"),
            Some(Address {
                street: None,
                number: None,
                suburb: "Durlach".to_string()
            })
        );
        assert_eq!(
            parse_address("Karlstraße 3a, Südstadt, Karlsruhe"),
            Some(Address {
                street: Some("Karlstraße".to_string()),
                number: Some("3a".to_string()),
                suburb: "Südstadt".to_string()
            })
        );
        assert_eq!(
            parse_address("Marktplatz, Innenstadt-Ost, Karlsruhe"),
            Some(Address {
                street: Some("Marktplatz".to_string()),
                number: None,
                suburb: "Innenstadt-Ost".to_string()
            })
        );
        assert_eq!(
            parse_address("Am Alten Schlachthof 5, Oststadt, Karlsruhe"),
            Some(Address {
                street: Some("Am Alten Schlachthof".to_string()),
                number: Some("5".to_string()),
                suburb: "Oststadt".to_string()
            })
        );
    }
}
