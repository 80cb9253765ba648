/// Display color for the `i`-th piece, as `#rrggbb`.
pub fn piece_color(i: usize) -> String {
    // One hue per classic tangram piece; cycles by index%7.
    const PALETTE: [&str; 7] = [
        "#e53935", // 0 red
        "#fb8c00", // 1 orange
        "#fdd835", // 2 yellow
        "#43a047", // 3 green
        "#00acc1", // 4 teal
        "#3949ab", // 5 indigo
        "#8e24aa", // 6 purple
    ];
    PALETTE[i % PALETTE.len()].to_string()
}
