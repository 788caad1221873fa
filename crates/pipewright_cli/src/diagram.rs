//! ASCII stage diagram shown by the init wizard.

const STAGE_DELIMITERS: [&str; 4] = ["  ", "  ", "->", "  "];

fn lines_for_stage(stage_index: usize) -> [String; 4] {
    [
        " _________ ".to_string(),
        "|         |".to_string(),
        format!("| Stage {} |", stage_index),
        "|_________|".to_string(),
    ]
}

/// Render `number_of_stages` boxed stages connected left to right.
pub fn render_stage_diagram(number_of_stages: usize) -> String {
    let stage_lines: Vec<[String; 4]> = (1..=number_of_stages).map(lines_for_stage).collect();
    STAGE_DELIMITERS
        .iter()
        .enumerate()
        .map(|(row, delimiter)| {
            stage_lines
                .iter()
                .map(|lines| lines[row].as_str())
                .collect::<Vec<_>>()
                .join(delimiter)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn draw_stage_diagram(number_of_stages: usize) {
    println!("{}", render_stage_diagram(number_of_stages));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_stage_diagram() {
        let diagram = render_stage_diagram(2);
        let lines: Vec<&str> = diagram.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], " _________    _________ ");
        assert_eq!(lines[1], "|         |  |         |");
        assert_eq!(lines[2], "| Stage 1 |->| Stage 2 |");
        assert_eq!(lines[3], "|_________|  |_________|");
    }

    #[test]
    fn test_single_stage_has_no_arrow() {
        let diagram = render_stage_diagram(1);
        assert_eq!(diagram.lines().count(), 4);
        assert!(!diagram.contains("->"));
        assert!(diagram.contains("| Stage 1 |"));
    }
}
