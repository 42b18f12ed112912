/*!
 * Tests for ISO language code utilities
 */

use ppt_translator::language_utils::{
    display_name, get_language_name, language_codes_match, normalize_to_part2t,
    validate_language_code, LanguageCodeType,
};

#[test]
fn test_validateLanguageCode_withKnownCodes_shouldReportType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("fra").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);
    assert_eq!(validate_language_code("zh-TW").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("es-419").unwrap(), LanguageCodeType::Part1);
}

#[test]
fn test_validateLanguageCode_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("english").is_err());
    assert!(validate_language_code("zh-Taiwan").is_err());
}

#[test]
fn test_normalizeToPart2t_shouldConvertAllForms() {
    assert_eq!(normalize_to_part2t("de").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("deu").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("ZH-cn").unwrap(), "zho");
}

#[test]
fn test_languageCodesMatch_acrossForms_shouldMatch() {
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("zh-TW", "zho-tw"));
    assert!(!language_codes_match("fr", "de"));
    assert!(!language_codes_match("zh", "zh-TW"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
    assert_eq!(display_name("pt-BR"), "Portuguese (BR)");
    assert_eq!(display_name("qq"), "qq");
}
