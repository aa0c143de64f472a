//! Localised labels for backend field names and value codes.

/// Field names the backend uses in `display_params` and tool arguments.
const FIELD_LABELS: &[(&str, &str)] = &[
    ("date_from", "من تاريخ"),
    ("date_to", "إلى تاريخ"),
    ("start_date", "تاريخ البداية"),
    ("end_date", "تاريخ النهاية"),
    ("leave_type", "نوع الإجازة"),
    ("days", "عدد الأيام"),
    ("reason", "السبب"),
    ("employee_id", "الرقم الوظيفي"),
    ("employee_name", "اسم الموظف"),
    ("tool_name", "الإجراء"),
];

/// Value codes, mostly leave types from the HR system.
const VALUE_LABELS: &[(&str, &str)] = &[
    ("SAU_ANN", "إجازة سنوية"),
    ("SAU_SICK", "إجازة مرضية"),
    ("SAU_EMER", "إجازة اضطرارية"),
    ("SAU_UNPAID", "إجازة بدون راتب"),
    ("SAU_MAT", "إجازة أمومة"),
    ("SAU_PAT", "إجازة أبوة"),
    ("SAU_MARR", "إجازة زواج"),
    ("SAU_HAJJ", "إجازة حج"),
    ("SAU_BRV", "إجازة وفاة"),
    ("SAU_EXAM", "إجازة امتحانات"),
    ("submit_leave_request", "تقديم طلب إجازة"),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, label)| *label)
}

/// Localised label for a field name; unknown names come back trimmed.
#[must_use]
pub fn field_label(name: &str) -> &str {
    let key = name.trim();
    lookup(FIELD_LABELS, key).unwrap_or(key)
}

/// Localised label for a value code; unknown values come back trimmed.
#[must_use]
pub fn value_label(value: &str) -> &str {
    let key = value.trim();
    lookup(VALUE_LABELS, key).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_are_translated() {
        assert_eq!(field_label("leave_type"), "نوع الإجازة");
        assert_eq!(value_label("SAU_ANN"), "إجازة سنوية");
        assert_eq!(value_label("  SAU_SICK "), "إجازة مرضية");
    }

    #[test]
    fn test_unknown_keys_pass_through_trimmed() {
        assert_eq!(field_label("  colour "), "colour");
        assert_eq!(value_label("2024-09-25"), "2024-09-25");
    }
}
