diesel::table! {
    listings (id) {
        id -> Text,
        street -> Nullable<Text>,
        number -> Nullable<Text>,
        suburb -> Text,
        rent -> Double,
        area -> Double,
        latitude -> Nullable<Double>,
        longitude -> Nullable<Double>,
        date -> Timestamp,
    }
}
