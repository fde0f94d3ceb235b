#[cfg(test)]
mod listing_storage {
    use rentmap::{
        db::{establish_connection, listing},
        models::listing::{Coordinates, InsertableListing, NOT_FOUND},
    };

    fn new_listing(id: &str, number: Option<&str>, rent: f64) -> InsertableListing {
        InsertableListing {
            id: id.to_string(),
            street: Some("Kaiserallee".to_string()),
            number: number.map(String::from),
            suburb: "Weststadt".to_string(),
            rent,
            area: 50.0,
        }
    }

    #[test]
    fn known_listings_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let conn = &mut establish_connection(&dir.path().join("listings.sqlite")).unwrap();

        let first = vec![new_listing("1", Some("1"), 500.0), new_listing("2", Some("2"), 600.0)];
        assert_eq!(listing::insert_all(conn, &first).unwrap(), 2);

        let second = vec![new_listing("2", Some("2"), 999.0), new_listing("3", None, 700.0)];
        assert_eq!(listing::insert_all(conn, &second).unwrap(), 1);

        assert_eq!(listing::count(conn).unwrap(), 3);
        let kept = listing::get_by_id(conn, "2").unwrap().unwrap();
        assert_eq!(kept.rent, 600.0);
    }

    #[test]
    fn reopening_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.sqlite");
        {
            let conn = &mut establish_connection(&path).unwrap();
            listing::insert_all(conn, &[new_listing("1", Some("1"), 500.0)]).unwrap();
        }
        let conn = &mut establish_connection(&path).unwrap();
        assert_eq!(listing::count(conn).unwrap(), 1);
    }

    #[test]
    fn coordinates_and_export_selection() {
        let dir = tempfile::tempdir().unwrap();
        let conn = &mut establish_connection(&dir.path().join("listings.sqlite")).unwrap();
        listing::insert_all(
            conn,
            &[
                new_listing("located", Some("1"), 500.0),
                new_listing("missing", Some("2"), 500.0),
                new_listing("no-number", None, 500.0),
                new_listing("pending", Some("4"), 500.0),
            ],
        )
        .unwrap();
        assert_eq!(listing::get_without_coordinates(conn).unwrap().len(), 4);

        let here = Coordinates {
            latitude: 49.00937,
            longitude: 8.40444,
        };
        let updated = listing::set_coordinates(
            conn,
            &[
                ("located".to_string(), here),
                ("missing".to_string(), Coordinates::not_found()),
                ("no-number".to_string(), here),
            ],
        )
        .unwrap();
        assert_eq!(updated, 3);

        let pending = listing::get_without_coordinates(conn).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "pending");

        let missing = listing::get_by_id(conn, "missing").unwrap().unwrap();
        assert_eq!(missing.latitude, Some(NOT_FOUND));

        let exportable = listing::get_exportable(conn).unwrap();
        let ids: Vec<&str> = exportable.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["located"]);
        assert_eq!(exportable[0].coordinates(), Some(here));
    }

    #[test]
    fn unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let conn = &mut establish_connection(&dir.path().join("listings.sqlite")).unwrap();
        assert_eq!(listing::get_by_id(conn, "nope").unwrap(), None);
        assert_eq!(listing::set_coordinates(conn, &[("nope".to_string(), Coordinates::not_found())]).unwrap(), 0);
    }
}
