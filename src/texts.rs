//! User-facing strings, word lists and media resources.
//!
//! Everything the bot says lives here. Strings with `{placeholder}` holes
//! are filled by the handlers via `str::replace`.

pub const BOT_VERSION: &str = "1.2.0";

pub const PROJECT_URL: &str = "https://github.com/rudecat/rudecat";
pub const PAGE_LABEL: &str = "Github";

pub const INFO_TEXT: &str = "Привіт, я Рудекіт!\n\n\
Я можу дещо зробити, якшо ти скажеш чарівне слово:\n\
<code>Карма</code> - покажу твою карму,\n\
<code>Топ</code> - покажу топ учасників чату,\n\
<code>Тесла</code> - порахую дні без згадування тесли,\n\
<code>Кіт</code> - покажу котика,\n\
<code>Кіт &lt;питання&gt;</code> - відповім на будь-яке питання,\n\
<code>Шарій</code> - покажу півника,\n\
<code>/warn /unwarn</code> - (admins only) винесу попередження за погану поведінку,\n\
<code>/scan</code> - (admins only) просканую когось,\n\
<code>/give 25</code> - поділитися рудекоїнами,\n\
<code>/tickets</code> - (admins only) покажу тікети чату,\n\
А ще я вітаю новеньких у чаті.\n\n\
Версія <code>{version}</code>";

// Reactions
pub const RU_PROPAGANDA: &str =
    "<b>Російська пропаганда не може вважатися пруфом!</b>\n\nВас буде додано до реєстру.";
pub const PALANYTSIA: &str = "Ану кажи \"паляниця\" 😡";
pub const TESLA_AGAIN: &str =
    "Днів без згадування тесли: <code>0</code>\n🚗🚗🚗\n\n...btw ${price}";
pub const TESLA_NO_PRICE: &str = "Днів без згадування тесли: <code>0</code>\n🚗🚗🚗";

// Karma
pub const KARMA_INCREASE: &str = "Карма {mention} підвищена: <code>{karma}</code> 👍";
pub const KARMA_DECREASE: &str = "Карма {mention} понижена: <code>{karma}</code> 👎";
pub const STATS_CARD: &str = "Привіт {name}, твоя карма:\n\n\
Карма: <code>{karma} ({karma_percent}%)</code>\n\
🚧Попереджень: <code>{warns}</code>\n\
Повідомлень: <code>{messages}</code>\n\
Матюків: <code>{bad_words} ({bad_words_percent}%)</code>\n\
Rude-коїнів: <code>{rude_coins}</code>💰\n\
Довжина: <code>{size}</code> сантиметрів, ну і гігант...\n\
Орієнтація: <code>{orientation}</code> користувач";

// Leaderboard
pub const ACCOUNTS_IN_CHAT: &str = "Акаунтів у чаті";
pub const TOP_CHAT_KARMA: &str = "Топ карми чату 👍:";
pub const TOP_CHAT_NEGATIVE_KARMA: &str = "Топ зрадників чату 👎:";
pub const TOP_CHAT_ACTIVE: &str = "Топ базік чату 🗣:";
pub const TOP_CHAT_EMOTIONALS: &str = "Топ емоційних чату 🤬:";
pub const TOP_CHAT_WARNS: &str = "Топ хуліганів чату 🚧:";
pub const KARMA_LABEL: &str = "карма";
pub const MESSAGES_LABEL: &str = "повідомлень";
pub const BAD_WORDS_LABEL: &str = "матюків";
pub const WARNS_LABEL: &str = "попереджень";

// Tickets
pub const ONLY_ADMINS_ARE_ALLOWED: &str = "Тільки адміни можуть таке 😎";
pub const TICKETS_HEADER: &str = "Тікети чату 📋:";
pub const NO_TICKETS: &str = "Тікетів немає, всі вільні 🎉";
pub const TICKET_ADDED: &str = "Тікет додано: <code>{description}</code>";
pub const TICKET_DELETED: &str = "Тікет <code>{id}</code> видалено";
pub const NEED_TO_DEFINE_TICKET: &str = "Шо додавати? Напиши опис тікета після команди";
pub const WHERE_IS_TICKET_NUMBER: &str = "А номер тікета хто писати буде?";
pub const HACKER_IN_THE_CHAT: &str = "Хакер у чаті! Немає такого тікета 🕵️";
pub const ARE_YOU_THINK_IM_THAT_DUMB: &str = "Ти думаєш я настільки тупий? Номер, цифрами";

// Moderation
pub const NEED_REPLY_TARGET: &str = "Команда працює тільки реплаєм на повідомлення";
pub const WARN_ADDED: &str = "🚧 {mention} отримує попередження ({warns} всього)";
pub const WARN_REMOVED: &str = "😇 {mention} виправився, попереджень: {warns}";
pub const GIVE_USAGE: &str = "Скільки? Напиши <code>/give 25</code>";
pub const GIVE_NOT_ENOUGH: &str = "А рудекоїни де? У тебе всього <code>{balance}</code> 💰";
pub const GIVE_DONE: &str = "💰 {mention} отримує <code>{amount}</code> рудекоїнів від {sender}";
pub const LANGUAGE_WATCH_ON: &str = "Мовний патруль увімкнено 🇺🇦";
pub const LANGUAGE_WATCH_OFF: &str = "Мовний патруль вимкнено 😴";
pub const LANGUAGE_WATCH_USAGE: &str = "Напиши <code>/language_watch on</code> або <code>/language_watch off</code>";

// Cats
pub const GONE_AWAY: &str = "Коти розбіглися, спробуй пізніше 😿";
pub const CAT_BUTTON_BOY: &str = "Кіт";
pub const CAT_BUTTON_GIRL: &str = "Кітесса";
pub const CAT_NAME_ANSWER: &str = "Хай буде {name}!";

// Completions
pub const OOPS_I_DIDNT_AGAIN: &str = "Упс, я це знову зробив... Кіт зараз не в гуморі, спитай пізніше 🙀";
pub const EMPTY_PROMPT: &str = ":)";
pub const GPT_MODEL: &str = "gpt-3.5-turbo-instruct";

// Onboarding
pub const WELCOME_CAPTION: &str = "Вітаємо {mention} у нашому чаті! \
Ми не чат, а дружня, толерантна IT спільнота, яка поважає думку кожного, приєднавшись, \
ти згоджуєшся стати чемною частиною спільноти (та полюбити епл).\
\n\nI якшо не важко, пліз тут анкета на 8 питань";
pub const FORM_LABEL: &str = "Анкета";
pub const PROMISE_LABEL: &str = "Я обіцяю!";
pub const WRONG_USER_ALERT: &str = "Ще раз і бан :)";
pub const WELCOME_CONFIRMED_ALERT: &str =
    "Дуже раді вас бачити! Будь ласка, ознайомтеся з Конституцією чату в закріплених повідомленнях.";
pub const GOOGLE_FORM_URL: &str = "https://forms.gle/rudecat-newbies";

// Media
pub const WELCOME_ANIMATION_URL: &str =
    "https://media.giphy.com/media/l0HlHFRbmaZtBRhXG/giphy.gif";
pub const SAMSUNG_PHOTO_URL: &str = "https://i.imgur.com/2yLDCrU.jpg";
pub const COCKMAN_VIDEO_URL: &str = "https://i.imgur.com/gPl0jbF.mp4";

/// Words that raise the author's karma when said in a reply.
pub const THANKS_WORDS: &[&str] = &[
    "дякую",
    "дяка",
    "дякс",
    "спасибі",
    "спасибо",
    "thanks",
    "thank you",
    "thx",
    "спс",
    "сенкс",
];

/// Stems counted into the bad-words statistic.
pub const BAD_WORDS: &[&str] = &[
    "бля",
    "сука",
    "суки",
    "хуй",
    "хуя",
    "хує",
    "пизд",
    "їбат",
    "їбан",
    "ебат",
    "нахуй",
    "похуй",
    "підар",
    "підор",
    "гандон",
    "мудак",
    "мудил",
    "курва",
    "срак",
    "падл",
];

/// Random cat names offered under a cat photo.
pub const CAT_NAMES: &[&str] = &[
    "Барсик",
    "Мурчик",
    "Гарфілд",
    "Сімба",
    "Том",
    "Леопольд",
    "Багіра",
    "Мася",
    "Лапка",
    "Пухнастик",
];

/// Lines the bot drops as unsolicited advice.
pub const ADVICES: &[&str] = &[
    "Вимкни і увімкни знову.",
    "Спочатку напиши тест, потім плач.",
    "Git blame покаже винного. Це ти.",
    "Краще задеплоїти в п'ятницю, ніж ніколи.",
    "Почитай документацію, вона існує.",
    "Твій код працює? Не чіпай його.",
    "Кава не баг, кава фіча.",
    "Зроби бекап. Серйозно, прямо зараз.",
    "Легасі код теж колись був молодим.",
    "Не сперечайся з QA, вони завжди мають рацію.",
    "Рефакторинг без тестів - це вандалізм.",
    "Спитай у качки, вона знає.",
    "Переназви змінну, і сенс життя знайдеться.",
    "Продакшн сам себе не зламає. Хоча...",
    "Стендап - це не про стояння, на жаль.",
];
