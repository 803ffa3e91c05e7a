pub fn profile_fixture() -> &'static str {
    return r#"{"userId":"u-42","username":"lan","email":"lan@example.com"}"#;
}

pub fn wallet_fixture() -> &'static str {
    return r#"{"message":"ok","data":{"totalBalance":"1250000"}}"#;
}

/// A day of mixed transactions. Amounts arrive both as numbers and as
/// numeric strings, the same way the API serves them.
pub fn transactions_fixture() -> &'static str {
    return r#"
{
  "data": [
    {
      "id": 1,
      "amount": "20000",
      "type": "EXPENSE",
      "note": "mua cà phê",
      "categoryName": "Ăn uống",
      "createdAt": "2026-10-18T08:12:00.000Z"
    },
    {
      "id": "2",
      "amount": 5000000,
      "type": "INCOME",
      "note": "lương",
      "categoryName": "Lương",
      "date": "2026-10-18"
    },
    {
      "id": 3,
      "amount": "abc",
      "note": "không rõ"
    }
  ]
}
"#
    .trim();
}
