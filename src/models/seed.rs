use super::Question;

/// The built-in five-question set: first-run data and the target of every
/// reset. Ids are the literal strings "1" through "5".
pub fn seed_questions() -> Vec<Question> {
    fn q(
        id: &str,
        question: &str,
        options: [&str; 4],
        correct_answer: &str,
        explanation: &str,
        icon: &str,
    ) -> Question {
        Question {
            id: Some(id.to_string()),
            question: question.to_string(),
            options: options.map(str::to_string),
            correct_answer: correct_answer.to_string(),
            explanation: explanation.to_string(),
            icon: icon.to_string(),
        }
    }

    vec![
        q(
            "1",
            "日本で「鎌倉幕府」が開かれたのは何年？",
            ["1185年", "1192年", "1203年", "1221年"],
            "1192年",
            "鎌倉幕府は源頼朝によって1192年に開かれました。これは日本初の武家政権とされています。",
            "⚔️",
        ),
        q(
            "2",
            "「関ヶ原の戦い」が起きたのは何年？",
            ["1598年", "1600年", "1603年", "1615年"],
            "1600年",
            "関ヶ原の戦いは1600年に徳川家康と石田三成を中心とした東西の大名連合の間で行われました。",
            "🏯",
        ),
        q(
            "3",
            "江戸幕府の最後の将軍は誰？",
            ["徳川家茂", "徳川慶喜", "徳川家定", "徳川家光"],
            "徳川慶喜",
            "徳川慶喜は江戸幕府の第15代将軍で、大政奉還により政権を朝廷に返上しました。",
            "👑",
        ),
        q(
            "4",
            "明治維新が起きたのは何年？",
            ["1853年", "1867年", "1868年", "1889年"],
            "1868年",
            "明治維新は1868年に起こり、江戸幕府から明治政府への政治体制の転換が行われました。",
            "🎌",
        ),
        q(
            "5",
            "日清戦争が起きたのは何年から何年？",
            ["1894年〜1895年", "1904年〜1905年", "1914年〜1918年", "1937年〜1945年"],
            "1894年〜1895年",
            "日清戦争は1894年から1895年にかけて、日本と清（現在の中国）の間で行われた戦争です。",
            "⛵",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_five_valid_questions() {
        let seed = seed_questions();
        assert_eq!(seed.len(), 5);
        for question in &seed {
            question.validate().unwrap();
        }
    }

    #[test]
    fn seed_ids_are_one_through_five() {
        let ids: Vec<_> = seed_questions()
            .into_iter()
            .map(|q| q.id.unwrap())
            .collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5"]);
    }
}
