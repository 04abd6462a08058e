//! Two-column balancing for TapRoot and Classic layouts

/// Sibling indices split into two columns, each in original sibling order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
    /// Sum of `estimate + child_padding` over the left column
    pub left_total: f64,
    /// Sum of `estimate + child_padding` over the right column
    pub right_total: f64,
}

impl Columns {
    pub fn difference(&self) -> f64 {
        (self.left_total - self.right_total).abs()
    }

    /// Estimated height of the taller column, without the trailing gap
    pub fn taller(&self, child_padding: f64) -> f64 {
        let column = |items: &[usize], total: f64| {
            if items.is_empty() {
                0.0
            } else {
                total - child_padding
            }
        };
        column(&self.left, self.left_total).max(column(&self.right, self.right_total))
    }
}

/// Greedy split of children into a left and a right column
///
/// While the left total is not larger than the right one, the next child is
/// taken from the front of the remaining sequence and appended to the left
/// column; otherwise it is taken from the back and prepended to the right
/// column. The left column is therefore always a prefix of the siblings and
/// the right column a suffix, and the totals never differ by more than the
/// largest single `estimate + child_padding`.
pub fn distribute_children_into_columns(estimates: &[f64], child_padding: f64) -> Columns {
    let mut columns = Columns::default();
    let mut right_reversed = Vec::new();
    let mut front = 0;
    let mut back = estimates.len();

    while front < back {
        if columns.left_total <= columns.right_total {
            columns.left.push(front);
            columns.left_total += estimates[front] + child_padding;
            front += 1;
        } else {
            back -= 1;
            right_reversed.push(back);
            columns.right_total += estimates[back] + child_padding;
        }
    }

    right_reversed.reverse();
    columns.right = right_reversed;
    columns
}
